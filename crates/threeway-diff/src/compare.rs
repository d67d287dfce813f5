//! Leaf classification.
//!
//! [`classify`] decides the kind of difference, if any, between the three
//! values found at one path. Rules are tried in order and the first match
//! wins:
//!
//! 1. falsy mode, all three falsy: nothing
//! 2. falsy mode, parent and theirs falsy, mine truthy: `E`
//! 3. falsy mode, parent and mine falsy, theirs truthy: `C`
//! 4. parent and theirs missing, mine present: `N`
//! 5. parent and theirs present, mine missing: `D`
//! 6. otherwise, by pairwise equality (arrays sorted first under
//!    `ignoreOrder`):
//!    all three differ: `C`; parent = theirs ≠ mine: `E`;
//!    parent = mine ≠ theirs: `C`; anything else: nothing.
//!
//! A change made only by mine is an edit. A change made by theirs that mine
//! does not share is a conflict, even when mine left the value untouched.

use std::cmp::Ordering;

use serde_json::{Map, Number, Value};

use threeway_types::{DiffKind, KeyOptions};

use crate::config::FalsyGap;
use crate::node::Node;

/// Classify the values found at one path.
pub fn classify(
    parent: Node<'_>,
    theirs: Node<'_>,
    mine: Node<'_>,
    options: &KeyOptions,
    gap: FalsyGap,
) -> Option<DiffKind> {
    if options.falsy {
        match (is_falsy(parent), is_falsy(theirs), is_falsy(mine)) {
            (true, true, true) => return None,
            (true, true, false) => return Some(DiffKind::Edit),
            (true, false, true) => return Some(DiffKind::Conflict),
            _ if gap == FalsyGap::Silent => return None,
            _ => {}
        }
    }

    match (parent.is_present(), theirs.is_present(), mine.is_present()) {
        (false, false, true) => return Some(DiffKind::New),
        (true, true, false) => return Some(DiffKind::Deleted),
        _ => {}
    }

    let unordered = options.ignore_order;
    let parent_theirs = leaf_equal(parent, theirs, unordered);
    let parent_mine = leaf_equal(parent, mine, unordered);
    let theirs_mine = leaf_equal(theirs, mine, unordered);

    if !parent_theirs && !parent_mine && !theirs_mine {
        Some(DiffKind::Conflict)
    } else if parent_theirs && !theirs_mine {
        Some(DiffKind::Edit)
    } else if parent_mine && !theirs_mine {
        Some(DiffKind::Conflict)
    } else {
        None
    }
}

fn leaf_equal(a: Node<'_>, b: Node<'_>, unordered: bool) -> bool {
    match (a, b) {
        (Node::Sequence(x), Node::Sequence(y)) if unordered => unordered_eq(x, y),
        _ => nodes_equal(a, b),
    }
}

/// `""`, `0`, `false`, `null` and missing values are falsy. Arrays and
/// objects are truthy even when empty.
pub fn is_falsy(node: Node<'_>) -> bool {
    match node {
        Node::Missing => true,
        Node::Scalar(Value::Null) => true,
        Node::Scalar(Value::Bool(flag)) => !flag,
        Node::Scalar(Value::Number(n)) => n.as_f64().is_some_and(|f| f == 0.0),
        Node::Scalar(Value::String(s)) => s.is_empty(),
        Node::Scalar(_) | Node::Sequence(_) | Node::Mapping(_) => false,
    }
}

/// Deep equality between two nodes. Missing only equals missing.
pub fn nodes_equal(a: Node<'_>, b: Node<'_>) -> bool {
    match (a, b) {
        (Node::Missing, Node::Missing) => true,
        (Node::Scalar(x), Node::Scalar(y)) => json_eq(x, y),
        (Node::Sequence(x), Node::Sequence(y)) => slices_eq(x, y),
        (Node::Mapping(x), Node::Mapping(y)) => maps_eq(x, y),
        _ => false,
    }
}

/// Deep equality between JSON values. Numbers compare by value, so `1` and
/// `1.0` are equal; object key order is irrelevant.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_eq(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => slices_eq(a, b),
        (Value::Object(a), Value::Object(b)) => maps_eq(a, b),
        _ => false,
    }
}

fn numbers_eq(a: &Number, b: &Number) -> bool {
    cmp_numbers(a, b) == Ordering::Equal
}

fn slices_eq(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
}

fn maps_eq(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .all(|(key, x)| b.get(key).is_some_and(|y| json_eq(x, y)))
}

/// Multiset equality: the arrays hold the same elements in any order.
fn unordered_eq(a: &[Value], b: &[Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&Value> = a.iter().collect();
    let mut b: Vec<&Value> = b.iter().collect();
    a.sort_by(|x, y| canonical_cmp(x, y));
    b.sort_by(|x, y| canonical_cmp(x, y));
    a.iter().zip(&b).all(|(x, y)| json_eq(x, y))
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// A total order over JSON values that agrees with [`json_eq`]: values rank
/// by type first, then by content.
pub fn canonical_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => cmp_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => cmp_slices(x, y),
        (Value::Object(x), Value::Object(y)) => cmp_maps(x, y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Exact numeric order. An integer and a float compare by the float's exact
/// value, never by rounding the integer to `f64`, so equality stays
/// transitive above 2^53.
fn cmp_numbers(a: &Number, b: &Number) -> Ordering {
    match (integer(a), integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => cmp_integer_float(x, float(b)),
        (None, Some(y)) => cmp_integer_float(y, float(a)).reverse(),
        (None, None) => {
            let (x, y) = (float(a), float(b));
            x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
        }
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn cmp_integer_float(int: i128, float: f64) -> Ordering {
    let floor = float.floor();
    // `as` saturates, and every i64/u64 lies well inside the i128 range.
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ord => ord,
    }
}

fn cmp_slices(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = canonical_cmp(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_maps(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    let mut a: Vec<(&String, &Value)> = a.iter().collect();
    let mut b: Vec<(&String, &Value)> = b.iter().collect();
    a.sort_by(|x, y| x.0.cmp(y.0));
    b.sort_by(|x, y| x.0.cmp(y.0));

    for ((kx, vx), (ky, vy)) in a.iter().zip(&b) {
        let ord = kx.cmp(ky).then_with(|| canonical_cmp(vx, vy));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}
