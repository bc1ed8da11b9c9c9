//! Thread-safe registry of session trees.

use crate::tree::TreeHandle;
use crate::view::Viewer;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// One registered tree.
#[derive(Debug, Clone)]
pub struct RegisteredTree {
    /// Label given at registration, usually `ip:port` of the peer.
    pub label: String,
    /// Read access to the tree.
    pub tree: TreeHandle,
    /// When the tree was registered.
    pub registered_at: DateTime<Utc>,
}

/// Registrations in arrival order.
///
/// Labels are not unique: a peer port can be reused by a later connection,
/// and both trees are kept.
#[derive(Debug, Default)]
pub struct TreeRegistry {
    entries: Mutex<Vec<RegisteredTree>>,
}

impl TreeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RegisteredTree>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Labels in registration order.
    pub fn labels(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.label.clone()).collect()
    }

    /// The most recent tree registered under `label`.
    pub fn get(&self, label: &str) -> Option<TreeHandle> {
        self.lock()
            .iter()
            .rev()
            .find(|e| e.label == label)
            .map(|e| e.tree.clone())
    }

    /// Copy of every registration in order.
    pub fn entries(&self) -> Vec<RegisteredTree> {
        self.lock().clone()
    }
}

impl Viewer for TreeRegistry {
    fn register(&self, label: &str, tree: TreeHandle) {
        debug!(label, "Tree registered");
        self.lock().push(RegisteredTree {
            label: label.to_string(),
            tree,
            registered_at: Utc::now(),
        });
    }
}
