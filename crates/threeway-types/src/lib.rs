//! Foundation types for three-way document diffs.
//!
//! This crate provides the path, record, and option types shared by the
//! diff engine and its callers. Documents themselves are plain
//! [`serde_json::Value`] trees.
//!
//! # Key Types
//!
//! - [`PathToken`] / [`Path`] -- Location of a value within a document
//! - [`DiffKind`] / [`DiffRecord`] -- One classified leaf difference
//! - [`KeyOptions`] -- Per-key flags arranged in the shape of the documents

pub mod error;
pub mod options;
pub mod path;
pub mod record;

pub use error::{TypeError, TypeResult};
pub use options::KeyOptions;
pub use path::{Path, PathToken};
pub use record::{DiffKind, DiffRecord};
