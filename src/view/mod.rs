//! Viewer interface and reference implementations.
//!
//! The server only needs one thing from a viewer: somewhere to register each
//! new session's tree under a label. [`Viewer`] is that interface. The rest of
//! this module is the small in-process viewer the binary uses:
//! - [`TreeRegistry`] - thread-safe list of registered trees
//! - [`render_text`] / [`render_json`] - tree renderers
//! - [`ConsoleViewer`] - prints each tree once its session is over

pub mod console;
pub mod registry;
pub mod render;

pub use console::ConsoleViewer;
pub use registry::{RegisteredTree, TreeRegistry};
pub use render::{render_json, render_text, NodeSnapshot, TreeSnapshot};

use crate::tree::TreeHandle;
use std::sync::Arc;

/// Registrar for per-connection trees.
///
/// Called exactly once per serviced connection, before its session reads
/// anything. Calls may arrive concurrently.
pub trait Viewer: Send + Sync {
    /// Take read access to a new session's tree.
    fn register(&self, label: &str, tree: TreeHandle);
}

impl<V: Viewer + ?Sized> Viewer for Arc<V> {
    fn register(&self, label: &str, tree: TreeHandle) {
        (**self).register(label, tree);
    }
}
