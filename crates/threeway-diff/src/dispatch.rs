//! Key dispatcher.
//!
//! Decides, per visited key, whether to recurse or to compare a leaf. The
//! route is chosen by the shape of the value that triggered the visit; the
//! three compared values are always looked up fresh in each document.
//!
//! | trigger shape                    | route                                |
//! |----------------------------------|--------------------------------------|
//! | object                           | traverse the three children          |
//! | array of scalars (or empty)      | one leaf comparison of whole arrays  |
//! | array holding objects or arrays  | traverse element by element          |
//! | scalar                           | one leaf comparison                  |
//!
//! Before routing, a key whose value only mine has, or only parent and
//! theirs have, is compared as a single leaf so the whole value lands in one
//! `N` or `D` record.

use serde_json::Value;
use threeway_types::{KeyOptions, PathToken};
use tracing::trace;

use crate::compare::classify;
use crate::config::ArrayCoverage;
use crate::error::DiffResult;
use crate::node::Node;
use crate::traverse::Walker;

impl Walker<'_> {
    /// Handle one key of the containers `parent`, `theirs` and `mine`.
    pub(crate) fn dispatch<'a>(
        &mut self,
        key: &PathToken,
        trigger: Node<'a>,
        parent: Node<'a>,
        theirs: Node<'a>,
        mine: Node<'a>,
        options: &KeyOptions,
    ) -> DiffResult<()> {
        let key_options = options.child(key);
        if key_options.ignore_key {
            trace!(path = %self.current_path(), %key, "key ignored");
            return Ok(());
        }

        let parent = parent.get(key);
        let theirs = theirs.get(key);
        let mine = mine.get(key);

        if is_one_sided(parent, theirs, mine) {
            return self.descend(key.clone(), |w| {
                w.compare(parent, theirs, mine, key_options);
                Ok(())
            });
        }

        match trigger {
            Node::Mapping(_) => self.descend(key.clone(), |w| {
                w.traverse(parent, theirs, mine, key_options)
            }),
            Node::Sequence(items) if items.iter().all(is_scalar) => {
                self.descend(key.clone(), |w| {
                    w.compare(parent, theirs, mine, key_options);
                    Ok(())
                })
            }
            Node::Sequence(items) => {
                let len = match self.config.array_coverage {
                    ArrayCoverage::Trigger => items.len(),
                    ArrayCoverage::Union => [parent, theirs, mine]
                        .iter()
                        .filter_map(Node::sequence_len)
                        .fold(items.len(), usize::max),
                };
                self.descend(key.clone(), |w| {
                    w.walk_elements(len, parent, theirs, mine, key_options)
                })
            }
            Node::Scalar(_) | Node::Missing => self.descend(key.clone(), |w| {
                w.compare(parent, theirs, mine, key_options);
                Ok(())
            }),
        }
    }

    /// Compare positions `0..len` of three arrays. Element options are the
    /// options of the array's own key.
    ///
    /// Under [`ArrayCoverage::Union`] a slot that some branch lacks, or that
    /// holds a scalar on any branch, is compared as one leaf.
    fn walk_elements<'a>(
        &mut self,
        len: usize,
        parent: Node<'a>,
        theirs: Node<'a>,
        mine: Node<'a>,
        options: &KeyOptions,
    ) -> DiffResult<()> {
        let union_slots = self.config.array_coverage == ArrayCoverage::Union;
        for index in 0..len {
            let token = PathToken::Index(index);
            let parent = parent.get(&token);
            let theirs = theirs.get(&token);
            let mine = mine.get(&token);

            self.descend(token, |w| {
                if is_one_sided(parent, theirs, mine)
                    || (union_slots && is_leaf_slot(parent, theirs, mine))
                {
                    w.compare(parent, theirs, mine, options);
                    Ok(())
                } else {
                    w.traverse(parent, theirs, mine, options)
                }
            })?;
        }
        Ok(())
    }

    /// Classify the values at the current path and record the outcome.
    fn compare(
        &mut self,
        parent: Node<'_>,
        theirs: Node<'_>,
        mine: Node<'_>,
        options: &KeyOptions,
    ) {
        if let Some(kind) = classify(parent, theirs, mine, options, self.config.falsy_gap) {
            self.record(kind, parent, theirs, mine);
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Mine alone has the value, or mine alone lacks it.
fn is_one_sided(parent: Node<'_>, theirs: Node<'_>, mine: Node<'_>) -> bool {
    matches!(
        (parent.is_present(), theirs.is_present(), mine.is_present()),
        (false, false, true) | (true, true, false)
    )
}

/// Some branch lacks the slot or holds a scalar in it.
fn is_leaf_slot(parent: Node<'_>, theirs: Node<'_>, mine: Node<'_>) -> bool {
    [parent, theirs, mine]
        .iter()
        .any(|node| matches!(node, Node::Missing | Node::Scalar(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use threeway_types::{DiffKind, DiffRecord};

    use crate::config::DiffConfig;

    fn walk_with(
        config: &DiffConfig,
        parent: &Value,
        theirs: &Value,
        mine: &Value,
        options: &KeyOptions,
    ) -> Vec<DiffRecord> {
        let mut walker = Walker::new(config);
        walker
            .traverse(Node::of(parent), Node::of(theirs), Node::of(mine), options)
            .unwrap();
        walker.into_records()
    }

    fn walk(parent: &Value, theirs: &Value, mine: &Value) -> Vec<DiffRecord> {
        walk_with(&DiffConfig::default(), parent, theirs, mine, &KeyOptions::new())
    }

    #[test]
    fn object_values_recurse() {
        let parent = json!({"a": {"b": "x", "c": 1}});
        let theirs = json!({"a": {"b": "x", "c": 2}});
        let mine = json!({"a": {"b": "y", "c": 1}});

        let records = walk(&parent, &theirs, &mine);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, DiffKind::Edit);
        assert_eq!(records[0].path.to_string(), "a.b");
        assert_eq!(records[1].kind, DiffKind::Conflict);
        assert_eq!(records[1].path.to_string(), "a.c");
    }

    #[test]
    fn scalar_arrays_are_atomic() {
        let parent = json!({"k": [1, 2, 3]});
        let theirs = json!({"k": [1, 2, 3]});
        let mine = json!({"k": [1, 2, 4]});

        let records = walk(&parent, &theirs, &mine);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path.to_string(), "k");
        assert_eq!(records[0].mine, Some(json!([1, 2, 4])));
    }

    #[test]
    fn one_sided_object_is_one_record() {
        let records = walk(&json!({}), &json!({}), &json!({"k": {"a": {"b": 1}}}));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::New);
        assert_eq!(records[0].path.to_string(), "k");
        assert_eq!(records[0].mine, Some(json!({"a": {"b": 1}})));

        let gone = json!({"k": [{"a": 1}]});
        let records = walk(&gone, &gone, &json!({}));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::Deleted);
        assert_eq!(records[0].parent, Some(json!([{"a": 1}])));
    }

    #[test]
    fn ignored_key_skips_subtree() {
        let parent = json!({"k": {"a": 1}, "other": 1});
        let theirs = json!({"k": {"a": 2}, "other": 1});
        let mine = json!({"k": {"a": 3, "b": 4}, "other": 2});
        let options = KeyOptions::new().with_child("k", KeyOptions::new().with_ignore_key());

        let records = walk_with(&DiffConfig::default(), &parent, &theirs, &mine, &options);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path.to_string(), "other");
    }

    #[test]
    fn type_change_walks_each_side_keys() {
        // Mine turned an array into an object.
        let parent = json!({"k": [{"x": 1}, {"x": 2}]});
        let theirs = parent.clone();
        let mine = json!({"k": {"0": {"x": 1}, "extra": true}});

        let records = walk(&parent, &theirs, &mine);
        let summary: Vec<(DiffKind, String)> = records
            .iter()
            .map(|r| (r.kind, r.path.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DiffKind::New, "k.extra".to_string()),
                (DiffKind::Deleted, "k.1".to_string()),
            ]
        );
    }

    #[test]
    fn mixed_arrays_compare_by_position() {
        let parent = json!({"list": [{"id": 1, "v": "a"}, {"id": 2, "v": "b"}]});
        let theirs = json!({"list": [{"id": 1, "v": "a"}, {"id": 2, "v": "c"}]});
        let mine = json!({"list": [{"id": 1, "v": "z"}, {"id": 2, "v": "b"}]});

        let records = walk(&parent, &theirs, &mine);
        let summary: Vec<(DiffKind, String)> = records
            .iter()
            .map(|r| (r.kind, r.path.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DiffKind::Edit, "list.0.v".to_string()),
                (DiffKind::Conflict, "list.1.v".to_string()),
            ]
        );
    }

    #[test]
    fn mixed_array_elements_use_the_array_options() {
        let parent = json!({"list": [{"tags": [1, 2]}]});
        let theirs = json!({"list": [{"tags": [2, 1]}]});
        let mine = json!({"list": [{"tags": [1, 2]}]});
        let options = KeyOptions::new().with_child(
            "list",
            KeyOptions::new().with_child("tags", KeyOptions::new().with_ignore_order()),
        );

        let records = walk_with(&DiffConfig::default(), &parent, &theirs, &mine, &options);
        assert!(records.is_empty());
        assert_eq!(walk(&parent, &theirs, &mine).len(), 1);
    }

    #[test]
    fn trigger_coverage_follows_the_triggering_array() {
        let parent = json!({"list": [{"a": 1}, {"a": 2}, {"a": 3}]});
        let theirs = parent.clone();
        let mine = json!({"list": [{"a": 1}]});

        // Mine triggers the visit and only has index 0.
        assert!(walk(&parent, &theirs, &mine).is_empty());
    }

    #[test]
    fn union_coverage_reaches_every_branch() {
        let parent = json!({"list": [{"a": 1}, {"a": 2}, {"a": 3}]});
        let theirs = parent.clone();
        let mine = json!({"list": [{"a": 1}]});
        let config = DiffConfig {
            array_coverage: ArrayCoverage::Union,
            ..Default::default()
        };

        let records = walk_with(&config, &parent, &theirs, &mine, &KeyOptions::new());
        let summary: Vec<(DiffKind, String)> = records
            .iter()
            .map(|r| (r.kind, r.path.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (DiffKind::Deleted, "list.1".to_string()),
                (DiffKind::Deleted, "list.2".to_string()),
            ]
        );
        assert_eq!(records[0].parent, Some(json!({"a": 2})));
    }

    fn union_config() -> DiffConfig {
        DiffConfig {
            array_coverage: ArrayCoverage::Union,
            ..Default::default()
        }
    }

    #[test]
    fn union_coverage_reports_scalar_slot_theirs_dropped() {
        let parent = json!({"k": [{"a": 1}, 7]});
        let theirs = json!({"k": [{"a": 1}]});

        let records = walk_with(&union_config(), &parent, &theirs, &parent, &KeyOptions::new());
        assert_eq!(
            records,
            vec![DiffRecord::conflict(
                "k.1".parse().unwrap(),
                Some(json!(7)),
                None,
                Some(json!(7)),
            )]
        );
        assert!(walk(&parent, &theirs, &parent).is_empty());
    }

    #[test]
    fn union_coverage_reports_scalar_slot_theirs_appended() {
        let parent = json!({"k": [{"a": 1}]});
        let theirs = json!({"k": [{"a": 1}, 5]});

        let records = walk_with(&union_config(), &parent, &theirs, &parent, &KeyOptions::new());
        assert_eq!(
            records,
            vec![DiffRecord::conflict("k.1".parse().unwrap(), None, Some(json!(5)), None)]
        );
        assert!(walk(&parent, &theirs, &parent).is_empty());
    }

    #[test]
    fn union_coverage_treats_missing_object_slot_as_one_leaf() {
        let parent = json!({"k": [{"a": 1}, {"b": 7}]});
        let theirs = json!({"k": [{"a": 1}]});

        let records = walk_with(&union_config(), &parent, &theirs, &parent, &KeyOptions::new());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::Conflict);
        assert_eq!(records[0].path.to_string(), "k.1");
        assert_eq!(records[0].parent, Some(json!({"b": 7})));
        assert_eq!(records[0].theirs, None);
    }

    #[test]
    fn union_coverage_compares_scalar_elements_in_place() {
        let parent = json!({"list": [1, {"a": 1}]});
        let mine = json!({"list": [2, {"a": 1}]});

        let records = walk_with(&union_config(), &parent, &parent, &mine, &KeyOptions::new());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::Edit);
        assert_eq!(records[0].path.to_string(), "list.0");
    }

    #[test]
    fn mine_appended_element_is_new() {
        let parent = json!({"list": [{"a": 1}]});
        let mine = json!({"list": [{"a": 1}, {"a": 2}]});

        let records = walk(&parent, &parent, &mine);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::New);
        assert_eq!(records[0].path.to_string(), "list.1");
        assert_eq!(records[0].mine, Some(json!({"a": 2})));
    }

    #[test]
    fn scalar_elements_of_mixed_arrays_are_not_compared() {
        let parent = json!({"list": [1, {"a": 1}]});
        let mine = json!({"list": [2, {"a": 1}]});
        assert!(walk(&parent, &parent, &mine).is_empty());
    }

    #[test]
    fn null_parent_recurses_into_new_objects() {
        let parent = json!({"key": null});
        let theirs = json!({"key": {"childKey": "value1"}});
        let mine = json!({"key": {"childKey": "value2"}});

        let records = walk(&parent, &theirs, &mine);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::Conflict);
        assert_eq!(records[0].path.to_string(), "key.childKey");
        assert_eq!(records[0].parent, None);
    }
}
