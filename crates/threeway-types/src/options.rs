//! Per-key diff options.
//!
//! Options are arranged in the same shape as the documents being compared.
//! Every node carries three flags and any number of child nodes:
//!
//! ```json
//! {
//!   "tags": { "ignoreOrder": true },
//!   "profile": {
//!     "nickname": { "falsy": true },
//!     "lastSeen": { "ignoreKey": true }
//!   }
//! }
//! ```
//!
//! Flags apply to the key they are set on only. A flag on `profile` says
//! nothing about `profile.nickname`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TypeError, TypeResult};
use crate::path::{Path, PathToken};

/// Shared node returned for keys without options.
static NO_OPTIONS: KeyOptions = KeyOptions::new();

/// Options for one key, plus the options of its children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOptions {
    /// Skip the key and everything beneath it.
    #[serde(default, rename = "ignoreKey", skip_serializing_if = "is_false")]
    pub ignore_key: bool,
    /// Treat `""`, `0`, `false`, `null` and absence as one value.
    #[serde(default, skip_serializing_if = "is_false")]
    pub falsy: bool,
    /// Compare arrays as multisets.
    #[serde(default, rename = "ignoreOrder", skip_serializing_if = "is_false")]
    pub ignore_order: bool,
    #[serde(flatten)]
    children: BTreeMap<String, KeyOptions>,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl KeyOptions {
    /// A node with every flag off and no children.
    pub const fn new() -> Self {
        Self {
            ignore_key: false,
            falsy: false,
            ignore_order: false,
            children: BTreeMap::new(),
        }
    }

    /// Set `ignoreKey`.
    pub fn with_ignore_key(mut self) -> Self {
        self.ignore_key = true;
        self
    }

    /// Set `falsy`.
    pub fn with_falsy(mut self) -> Self {
        self.falsy = true;
        self
    }

    /// Set `ignoreOrder`.
    pub fn with_ignore_order(mut self) -> Self {
        self.ignore_order = true;
        self
    }

    /// Attach options for a child key, replacing any already present.
    pub fn with_child(mut self, key: impl Into<String>, child: KeyOptions) -> Self {
        self.children.insert(key.into(), child);
        self
    }

    /// Options for the child named by `token`.
    ///
    /// Keys without an entry resolve to a shared all-off node, so callers can
    /// descend through unconfigured levels freely.
    pub fn child(&self, token: &PathToken) -> &KeyOptions {
        self.children
            .get(token.as_key().as_ref())
            .unwrap_or(&NO_OPTIONS)
    }

    /// Options for a child key, if configured.
    pub fn get(&self, key: &str) -> Option<&KeyOptions> {
        self.children.get(key)
    }

    /// Options for the node at `path`, resolving missing levels to the
    /// all-off node.
    pub fn at(&self, path: &Path) -> &KeyOptions {
        path.iter().fold(self, |node, token| node.child(token))
    }

    /// Place `node` at `path`, creating intermediate nodes as needed.
    ///
    /// Inserting at the root path replaces this node's flags and children.
    pub fn insert_at(&mut self, path: &Path, node: KeyOptions) {
        let mut current = self;
        for token in path {
            current = current
                .children
                .entry(token.as_key().into_owned())
                .or_default();
        }
        *current = node;
    }

    /// Configured children, ordered by key.
    pub fn children(&self) -> impl Iterator<Item = (&str, &KeyOptions)> {
        self.children.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Returns `true` when no flag is set here or anywhere below.
    pub fn is_inert(&self) -> bool {
        !self.ignore_key
            && !self.falsy
            && !self.ignore_order
            && self.children.values().all(KeyOptions::is_inert)
    }

    /// Parse an options tree from JSON text.
    ///
    /// Flags must be booleans and every other entry must be an object.
    pub fn from_json_str(json: &str) -> TypeResult<Self> {
        serde_json::from_str(json).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Build an options tree from an arbitrary JSON value, dropping whatever
    /// does not fit: non-object nodes become all-off nodes, non-boolean flags
    /// and scalar children are skipped.
    pub fn from_value(value: &Value) -> Self {
        let mut node = Self::new();
        let Some(map) = value.as_object() else {
            return node;
        };

        for (key, entry) in map {
            match (key.as_str(), entry) {
                ("ignoreKey", Value::Bool(flag)) => node.ignore_key = *flag,
                ("falsy", Value::Bool(flag)) => node.falsy = *flag,
                ("ignoreOrder", Value::Bool(flag)) => node.ignore_order = *flag,
                (_, Value::Object(_)) => {
                    node.children.insert(key.clone(), Self::from_value(entry));
                }
                _ => {}
            }
        }
        node
    }
}
