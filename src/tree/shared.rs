//! Single-writer sharing of a scope tree.
//!
//! A session writes its tree while the viewer may read it at any time, during
//! and after the session. [`shared_tree`] hands out exactly one
//! [`TreeWriter`] (not `Clone`) and a cloneable read-only [`TreeHandle`], so
//! "one tree, one writer" holds by construction.

use crate::model::LogEntry;
use crate::tree::{ScopeTree, TreeLog};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Create a fresh tree and split it into its writer and a read handle.
pub fn shared_tree() -> (TreeWriter, TreeHandle) {
    let tree = Arc::new(RwLock::new(ScopeTree::new()));
    (
        TreeWriter {
            tree: Arc::clone(&tree),
        },
        TreeHandle { tree },
    )
}

/// The one write side of a shared tree.
///
/// Dropping the writer marks the tree closed.
#[derive(Debug)]
pub struct TreeWriter {
    tree: Arc<RwLock<ScopeTree>>,
}

impl TreeWriter {
    fn write(&self) -> RwLockWriteGuard<'_, ScopeTree> {
        // A panicking reader cannot leave the tree half-written: every
        // mutation is a single push or cursor move.
        self.tree.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// A read handle to the same tree.
    pub fn handle(&self) -> TreeHandle {
        TreeHandle {
            tree: Arc::clone(&self.tree),
        }
    }
}

impl TreeLog for TreeWriter {
    fn log(&mut self, entry: LogEntry) {
        self.write().log(entry);
    }

    fn metadata(&mut self, entry: LogEntry) {
        self.write().metadata(entry);
    }

    fn enter(&mut self, entry: LogEntry) {
        self.write().enter(entry);
    }

    fn leave(&mut self) {
        self.write().leave();
    }

    fn reset(&mut self) {
        self.write().reset();
    }
}

impl Drop for TreeWriter {
    fn drop(&mut self) {
        self.write().close();
    }
}

/// Read-only access to a shared tree.
#[derive(Debug, Clone)]
pub struct TreeHandle {
    tree: Arc<RwLock<ScopeTree>>,
}

impl TreeHandle {
    fn read(&self) -> RwLockReadGuard<'_, ScopeTree> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the current state of the tree.
    ///
    /// The writer is blocked while `f` runs, so keep it short.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ScopeTree) -> R) -> R {
        f(&self.read())
    }

    /// Copy of the tree as it is right now.
    pub fn snapshot(&self) -> ScopeTree {
        self.read().clone()
    }

    /// True once the writer has been dropped.
    pub fn is_closed(&self) -> bool {
        self.read().is_closed()
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// True when both handles point at the same tree.
    pub fn same_tree(&self, other: &TreeHandle) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree)
    }
}
