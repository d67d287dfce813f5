//! Traversal engine.
//!
//! [`Walker`] walks the three documents in lockstep, depth first. At each
//! level it visits the union of keys exactly once, in this order:
//!
//! 1. keys of mine, in mine's order;
//! 2. keys of parent that mine lacks, in parent's order;
//! 3. keys of theirs that both parent and mine lack, in theirs's order.
//!
//! Each key is handed to the dispatcher together with the value that caused
//! the visit. The walker owns a single path buffer; [`Walker::descend`]
//! pushes a token for the duration of a closure and truncates the buffer
//! back afterwards, whatever the closure returns.

use threeway_types::{DiffKind, DiffRecord, KeyOptions, Path, PathToken};
use tracing::warn;

use crate::config::DiffConfig;
use crate::error::{DiffError, DiffResult};
use crate::node::Node;

/// Depth-first walker over three documents.
pub(crate) struct Walker<'c> {
    pub(crate) config: &'c DiffConfig,
    path: Vec<PathToken>,
    records: Vec<DiffRecord>,
}

impl<'c> Walker<'c> {
    pub(crate) fn new(config: &'c DiffConfig) -> Self {
        Self {
            config,
            path: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Records collected so far, in visit order.
    pub(crate) fn into_records(self) -> Vec<DiffRecord> {
        self.records
    }

    /// Visit every key of the three nodes at the current path.
    pub(crate) fn traverse<'a>(
        &mut self,
        parent: Node<'a>,
        theirs: Node<'a>,
        mine: Node<'a>,
        options: &KeyOptions,
    ) -> DiffResult<()> {
        if self.path.len() > self.config.max_depth {
            let path = self.current_path();
            warn!(%path, limit = self.config.max_depth, "diff aborted at depth limit");
            return Err(DiffError::DepthLimitExceeded {
                path,
                limit: self.config.max_depth,
            });
        }

        for (key, value) in mine.entries() {
            self.dispatch(&key, value, parent, theirs, mine, options)?;
        }

        for (key, value) in parent.entries() {
            if mine.get(&key).is_missing() {
                self.dispatch(&key, value, parent, theirs, mine, options)?;
            }
        }

        for (key, value) in theirs.entries() {
            if parent.get(&key).is_missing() && mine.get(&key).is_missing() {
                self.dispatch(&key, value, parent, theirs, mine, options)?;
            }
        }

        Ok(())
    }

    /// Run `f` with `token` pushed onto the path.
    pub(crate) fn descend<R>(&mut self, token: PathToken, f: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.path.len();
        self.path.push(token);
        let result = f(self);
        self.path.truncate(depth);
        result
    }

    /// An owned copy of the current path.
    pub(crate) fn current_path(&self) -> Path {
        Path::from(self.path.as_slice())
    }

    /// Append a record of `kind` for the values at the current path.
    pub(crate) fn record(
        &mut self,
        kind: DiffKind,
        parent: Node<'_>,
        theirs: Node<'_>,
        mine: Node<'_>,
    ) {
        let record = DiffRecord::of_kind(
            kind,
            self.current_path(),
            parent.to_value(),
            theirs.to_value(),
            mine.to_value(),
        );
        self.records.push(record);
    }
}
