//! Paths into nested documents.
//!
//! A [`Path`] is the ordered list of keys and indices leading from the root
//! of a document to one value. Object keys are [`PathToken::Key`], sequence
//! positions are [`PathToken::Index`]. Serialized, a path is a JSON array of
//! strings and integers: `["config", "servers", 0, "port"]`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A single step in a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathToken {
    /// Position within a sequence.
    Index(usize),
    /// Key within a mapping.
    Key(String),
}

impl PathToken {
    /// Build a key token.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// The token as a mapping key. Indices render as their decimal form, so
    /// `Index(3)` and `Key("3")` name the same property.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            Self::Key(key) => Cow::Borrowed(key),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// The token as a sequence index.
    ///
    /// Keys only qualify when they are the canonical decimal form of an
    /// index (`"2"` does, `"02"` and `"-1"` do not).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(key) => {
                let index: usize = key.parse().ok()?;
                (index.to_string() == *key).then_some(index)
            }
        }
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathToken {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathToken {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathToken {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// An owned location within a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathToken>);

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from its tokens.
    pub fn from_tokens(tokens: impl IntoIterator<Item = PathToken>) -> Self {
        Self(tokens.into_iter().collect())
    }

    /// Number of tokens (the nesting depth of the addressed value).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The tokens, outermost first.
    pub fn tokens(&self) -> &[PathToken] {
        &self.0
    }

    /// The innermost token, if any.
    pub fn last(&self) -> Option<&PathToken> {
        self.0.last()
    }

    /// Iterate tokens, outermost first.
    pub fn iter(&self) -> std::slice::Iter<'_, PathToken> {
        self.0.iter()
    }

    /// Append a token.
    pub fn push(&mut self, token: impl Into<PathToken>) {
        self.0.push(token.into());
    }

    /// Consume the path, returning its tokens.
    pub fn into_tokens(self) -> Vec<PathToken> {
        self.0
    }
}

impl From<Vec<PathToken>> for Path {
    fn from(tokens: Vec<PathToken>) -> Self {
        Self(tokens)
    }
}

impl From<&[PathToken]> for Path {
    fn from(tokens: &[PathToken]) -> Self {
        Self(tokens.to_vec())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathToken;
    type IntoIter = std::slice::Iter<'a, PathToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Dotted notation: `config.servers.0.port`. The root path renders as an
/// empty string.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Parse dotted notation. Segments in canonical decimal form become
/// [`PathToken::Index`], everything else a [`PathToken::Key`]. Empty
/// segments are rejected; the empty string parses to the root path.
impl FromStr for Path {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }

        let mut tokens = Vec::new();
        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(TypeError::InvalidPath {
                    path: s.to_string(),
                    reason: "empty segment".into(),
                });
            }
            let token = PathToken::key(segment);
            tokens.push(match token.as_index() {
                Some(index) => PathToken::Index(index),
                None => token,
            });
        }
        Ok(Self(tokens))
    }
}
