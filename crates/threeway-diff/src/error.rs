//! Error types for the diff crate.

use std::fmt;

use threeway_types::{Path, TypeError};

/// Which of the three input documents an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Document {
    Parent,
    Theirs,
    Mine,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parent => "parent",
            Self::Theirs => "theirs",
            Self::Mine => "mine",
        })
    }
}

/// Errors that can occur during a three-way diff.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A root document is not a JSON object.
    #[error("{argument} must be an object, got {found}")]
    InvalidInput {
        argument: Document,
        found: &'static str,
    },

    /// The documents nest deeper than the configured limit.
    #[error("nesting exceeds depth limit of {limit} at `{path}`")]
    DepthLimitExceeded { path: Path, limit: usize },

    /// Path or options handling failed.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
