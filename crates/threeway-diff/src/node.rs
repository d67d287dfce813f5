//! Shape-tagged views of document values.
//!
//! Every value the engine looks at is wrapped in a [`Node`] once, and all
//! shape decisions are made by matching on it. [`Node::Missing`] stands for a
//! key that does not exist, which is distinct from a key holding `null`.

use serde_json::{Map, Value};

use threeway_types::PathToken;

/// A borrowed document value, classified by shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node<'a> {
    /// The key does not exist in this document.
    Missing,
    /// `null`, a boolean, a number or a string.
    Scalar(&'a Value),
    /// An array.
    Sequence(&'a [Value]),
    /// An object.
    Mapping(&'a Map<String, Value>),
}

impl<'a> Node<'a> {
    /// Classify a present value.
    pub fn of(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Mapping(map),
            scalar => Self::Scalar(scalar),
        }
    }

    /// Classify a looked-up value, `None` meaning absent.
    pub fn from_option(value: Option<&'a Value>) -> Self {
        value.map_or(Self::Missing, Self::of)
    }

    /// Returns `true` for [`Node::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns `true` for anything but [`Node::Missing`].
    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    /// Length of a sequence, `None` for every other shape.
    pub fn sequence_len(&self) -> Option<usize> {
        match *self {
            Self::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Look up a child.
    ///
    /// Objects accept index tokens by their decimal key and arrays accept
    /// key tokens in canonical decimal form. Scalars and missing values have
    /// no children.
    pub fn get(&self, token: &PathToken) -> Node<'a> {
        match *self {
            Self::Mapping(map) => Self::from_option(map.get(token.as_key().as_ref())),
            Self::Sequence(items) => {
                Self::from_option(token.as_index().and_then(|index| items.get(index)))
            }
            Self::Scalar(_) | Self::Missing => Self::Missing,
        }
    }

    /// Children in iteration order: object entries in insertion order, array
    /// elements by position.
    pub fn entries(&self) -> Vec<(PathToken, Node<'a>)> {
        match *self {
            Self::Mapping(map) => map
                .iter()
                .map(|(key, value)| (PathToken::key(key.as_str()), Self::of(value)))
                .collect(),
            Self::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(index, value)| (PathToken::Index(index), Self::of(value)))
                .collect(),
            Self::Scalar(_) | Self::Missing => Vec::new(),
        }
    }

    /// An owned copy of the value, `None` when missing.
    pub fn to_value(&self) -> Option<Value> {
        match *self {
            Self::Missing => None,
            Self::Scalar(value) => Some(value.clone()),
            Self::Sequence(items) => Some(Value::Array(items.to_vec())),
            Self::Mapping(map) => Some(Value::Object(map.clone())),
        }
    }

    /// Short name of the shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Missing => "nothing",
            Self::Scalar(Value::Null) => "null",
            Self::Scalar(Value::Bool(_)) => "boolean",
            Self::Scalar(Value::Number(_)) => "number",
            Self::Scalar(_) => "string",
            Self::Sequence(_) => "array",
            Self::Mapping(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_shapes() {
        assert!(matches!(Node::of(&json!(null)), Node::Scalar(_)));
        assert!(matches!(Node::of(&json!("s")), Node::Scalar(_)));
        assert!(matches!(Node::of(&json!([1])), Node::Sequence(_)));
        assert!(matches!(Node::of(&json!({"a": 1})), Node::Mapping(_)));
        assert!(Node::from_option(None).is_missing());
    }

    #[test]
    fn null_is_present() {
        let doc = json!({"k": null});
        let node = Node::of(&doc).get(&PathToken::key("k"));
        assert!(node.is_present());
        assert_eq!(node.to_value(), Some(Value::Null));
    }

    #[test]
    fn lookups_cross_key_and_index_tokens() {
        let object = json!({"0": "zero", "a": 1});
        let array = json!(["first", "second"]);

        assert_eq!(
            Node::of(&object).get(&PathToken::Index(0)).to_value(),
            Some(json!("zero"))
        );
        assert_eq!(
            Node::of(&array).get(&PathToken::key("1")).to_value(),
            Some(json!("second"))
        );
        assert!(Node::of(&array).get(&PathToken::key("01")).is_missing());
        assert!(Node::of(&array).get(&PathToken::Index(2)).is_missing());
        assert!(Node::of(&json!("text")).get(&PathToken::Index(0)).is_missing());
        assert!(Node::Missing.get(&PathToken::key("a")).is_missing());
    }

    #[test]
    fn entries_keep_document_order() {
        let doc = json!({"z": 1, "a": 2, "m": 3});
        let keys: Vec<String> = Node::of(&doc)
            .entries()
            .into_iter()
            .map(|(token, _)| token.to_string())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let array = json!([true, false]);
        let tokens: Vec<PathToken> = Node::of(&array)
            .entries()
            .into_iter()
            .map(|(token, _)| token)
            .collect();
        assert_eq!(tokens, vec![PathToken::Index(0), PathToken::Index(1)]);

        assert!(Node::of(&json!(5)).entries().is_empty());
    }

    #[test]
    fn type_names() {
        assert_eq!(Node::of(&json!([])).type_name(), "array");
        assert_eq!(Node::of(&json!(1.5)).type_name(), "number");
        assert_eq!(Node::of(&json!("")).type_name(), "string");
        assert_eq!(Node::Missing.type_name(), "nothing");
    }
}
