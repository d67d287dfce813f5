//! Entry point: validate the three roots and run the walker.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use threeway_types::{DiffKind, DiffRecord, KeyOptions, Path};

use crate::compare::nodes_equal;
use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult, Document};
use crate::node::Node;
use crate::traverse::Walker;

/// The ordered records of one three-way diff.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThreeWayDiff {
    /// Records in traversal order.
    pub records: Vec<DiffRecord>,
}

impl ThreeWayDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no differences were found.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of records of `kind`.
    pub fn count(&self, kind: DiffKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// Returns `true` if any record needs attention.
    pub fn has_conflicts(&self) -> bool {
        self.records.iter().any(DiffRecord::is_conflict)
    }

    /// The `C` records.
    pub fn conflicts(&self) -> impl Iterator<Item = &DiffRecord> {
        self.records.iter().filter(|r| r.is_conflict())
    }

    /// Iterate all records.
    pub fn iter(&self) -> std::slice::Iter<'_, DiffRecord> {
        self.records.iter()
    }

    /// Records at or beneath a location given in dotted notation
    /// (`"profile.emails"`). The empty string selects every record.
    pub fn under(&self, prefix: &str) -> DiffResult<Vec<&DiffRecord>> {
        let prefix: Path = prefix.parse()?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.path.tokens().starts_with(prefix.tokens()))
            .collect())
    }

    /// Consume the diff, returning its records.
    pub fn into_records(self) -> Vec<DiffRecord> {
        self.records
    }
}

impl IntoIterator for ThreeWayDiff {
    type Item = DiffRecord;
    type IntoIter = std::vec::IntoIter<DiffRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ThreeWayDiff {
    type Item = &'a DiffRecord;
    type IntoIter = std::slice::Iter<'a, DiffRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Three-way diff engine holding a [`DiffConfig`].
#[derive(Clone, Debug, Default)]
pub struct Differ {
    config: DiffConfig,
}

impl Differ {
    /// An engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with a custom configuration.
    pub fn with_config(config: DiffConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Classify how `mine` differs from `parent` and `theirs`.
    ///
    /// All three roots must be JSON objects; they are checked in the order
    /// parent, theirs, mine and the first offender is reported. Identical
    /// documents short-circuit to an empty diff.
    pub fn diff(
        &self,
        parent: &Value,
        theirs: &Value,
        mine: &Value,
        options: &KeyOptions,
    ) -> DiffResult<ThreeWayDiff> {
        let parent = root(parent, Document::Parent)?;
        let theirs = root(theirs, Document::Theirs)?;
        let mine = root(mine, Document::Mine)?;

        if nodes_equal(parent, theirs) && nodes_equal(theirs, mine) {
            trace!("documents identical, skipping traversal");
            return Ok(ThreeWayDiff::new());
        }

        let mut walker = Walker::new(&self.config);
        walker.traverse(parent, theirs, mine, options)?;
        let diff = ThreeWayDiff {
            records: walker.into_records(),
        };

        debug!(
            records = diff.len(),
            conflicts = diff.count(DiffKind::Conflict),
            "three-way diff complete"
        );
        Ok(diff)
    }
}

fn root(value: &Value, argument: Document) -> DiffResult<Node<'_>> {
    match Node::of(value) {
        node @ Node::Mapping(_) => Ok(node),
        other => Err(DiffError::InvalidInput {
            argument,
            found: other.type_name(),
        }),
    }
}

/// Diff with the default configuration.
///
/// ```
/// use serde_json::json;
/// use threeway_diff::{diff, DiffKind, KeyOptions};
///
/// let parent = json!({"title": "draft"});
/// let theirs = json!({"title": "draft"});
/// let mine = json!({"title": "final"});
///
/// let result = diff(&parent, &theirs, &mine, &KeyOptions::new()).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.records[0].kind, DiffKind::Edit);
/// ```
pub fn diff(
    parent: &Value,
    theirs: &Value,
    mine: &Value,
    options: &KeyOptions,
) -> DiffResult<ThreeWayDiff> {
    Differ::new().diff(parent, theirs, mine, options)
}
