//! Classified differences.
//!
//! Each [`DiffRecord`] describes one location where the local version
//! ("mine") differs from the common ancestor ("parent") or from the other
//! author's version ("theirs"). Which sides a record carries depends on its
//! [`DiffKind`]:
//!
//! | kind | parent | theirs | mine |
//! |------|--------|--------|------|
//! | `N`  |        |        | yes  |
//! | `D`  | yes    | yes    |      |
//! | `E`  | yes    | yes    | yes  |
//! | `C`  | yes    | yes    | yes  |
//!
//! A side that is absent from its document is `None` even where the kind
//! would carry it.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::path::Path;

/// Classification of a single difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffKind {
    /// Mine introduced a value that neither parent nor theirs had.
    #[serde(rename = "N")]
    New,
    /// Mine removed a value that both parent and theirs had.
    #[serde(rename = "D")]
    Deleted,
    /// Mine changed a value that theirs left as it was in parent.
    #[serde(rename = "E")]
    Edit,
    /// Theirs changed a value that mine has not caught up with, or all three
    /// disagree.
    #[serde(rename = "C")]
    Conflict,
}

impl DiffKind {
    /// The one-letter code used in serialized records.
    pub fn code(&self) -> char {
        match self {
            Self::New => 'N',
            Self::Deleted => 'D',
            Self::Edit => 'E',
            Self::Conflict => 'C',
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One classified difference at one path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub kind: DiffKind,
    pub path: Path,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub theirs: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub mine: Option<Value>,
}

// A side written as `null` is a present null, not an absent side.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl DiffRecord {
    /// Build a record of `kind`, keeping only the sides that kind carries.
    pub fn of_kind(
        kind: DiffKind,
        path: Path,
        parent: Option<Value>,
        theirs: Option<Value>,
        mine: Option<Value>,
    ) -> Self {
        match kind {
            DiffKind::New => Self::added(path, mine),
            DiffKind::Deleted => Self::deleted(path, parent, theirs),
            DiffKind::Edit => Self::edit(path, parent, theirs, mine),
            DiffKind::Conflict => Self::conflict(path, parent, theirs, mine),
        }
    }

    /// An `N` record.
    pub fn added(path: Path, mine: Option<Value>) -> Self {
        Self {
            kind: DiffKind::New,
            path,
            parent: None,
            theirs: None,
            mine,
        }
    }

    /// A `D` record.
    pub fn deleted(path: Path, parent: Option<Value>, theirs: Option<Value>) -> Self {
        Self {
            kind: DiffKind::Deleted,
            path,
            parent,
            theirs,
            mine: None,
        }
    }

    /// An `E` record.
    pub fn edit(
        path: Path,
        parent: Option<Value>,
        theirs: Option<Value>,
        mine: Option<Value>,
    ) -> Self {
        Self {
            kind: DiffKind::Edit,
            path,
            parent,
            theirs,
            mine,
        }
    }

    /// A `C` record.
    pub fn conflict(
        path: Path,
        parent: Option<Value>,
        theirs: Option<Value>,
        mine: Option<Value>,
    ) -> Self {
        Self {
            kind: DiffKind::Conflict,
            path,
            parent,
            theirs,
            mine,
        }
    }

    /// Returns `true` for `C` records.
    pub fn is_conflict(&self) -> bool {
        self.kind == DiffKind::Conflict
    }
}
