//! Three-way structural diff for JSON documents.
//!
//! Given a common ancestor (`parent`), another author's version (`theirs`)
//! and the local version (`mine`), classifies every leaf where `mine`
//! introduced, removed, or edited a value, and flags the places where `mine`
//! has not caught up with `theirs`. Nothing is merged; the output is a list
//! of classified records for a caller to act on.
//!
//! # Key Types
//!
//! - [`Differ`] / [`diff`] -- Entry points
//! - [`ThreeWayDiff`] -- Ordered [`DiffRecord`]s with summary helpers
//! - [`DiffConfig`] -- Depth limit and coverage policies
//! - [`KeyOptions`] -- Per-key `ignoreKey` / `falsy` / `ignoreOrder` flags
//! - [`Node`] -- Shape-tagged view of a document value

pub mod compare;
pub mod config;
mod dispatch;
pub mod engine;
pub mod error;
pub mod node;
mod traverse;

pub use config::{ArrayCoverage, DiffConfig, FalsyGap};
pub use engine::{diff, Differ, ThreeWayDiff};
pub use error::{DiffError, DiffResult, Document};
pub use node::Node;
pub use threeway_types::{DiffKind, DiffRecord, KeyOptions, Path, PathToken};
