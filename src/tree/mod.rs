//! Hierarchical log sinks.
//!
//! A [`TreeLog`] receives the directives of one session and arranges them into
//! a scope tree. Implementations:
//! - [`ScopeTree`] - the accumulating in-memory arena tree
//! - [`TreeWriter`] / [`TreeHandle`] - single-writer, many-reader sharing of a
//!   `ScopeTree` between a session and the viewer
//! - [`ForwardingTreeLog`] - late-bound delegation with an explicit no-op target

pub mod forwarding;
pub mod scope_tree;
pub mod shared;

pub use forwarding::{ForwardingTreeLog, Target};
pub use scope_tree::{Node, NodeId, NodeKind, ScopeTree};
pub use shared::{shared_tree, TreeHandle, TreeWriter};

use crate::model::LogEntry;

/// Receiver of hierarchical log directives.
///
/// # Invariants
///
/// - `enter` deepens the cursor by exactly one level
/// - `leave` rises by at most one level and never above the root
/// - `reset` always lands on the root
/// - nothing is ever removed or reordered
pub trait TreeLog {
    /// Append `entry` as a leaf under the cursor. The cursor does not move.
    fn log(&mut self, entry: LogEntry);

    /// Append `entry` as a session fact under the cursor.
    ///
    /// Same placement as [`TreeLog::log`]; only the node's tag differs.
    fn metadata(&mut self, entry: LogEntry);

    /// Append `entry` under the cursor and move the cursor onto it.
    fn enter(&mut self, entry: LogEntry);

    /// Move the cursor to its parent. No-op at the root.
    fn leave(&mut self);

    /// Move the cursor to the root. History is kept.
    fn reset(&mut self);
}

impl<T: TreeLog + ?Sized> TreeLog for &mut T {
    fn log(&mut self, entry: LogEntry) {
        (**self).log(entry);
    }

    fn metadata(&mut self, entry: LogEntry) {
        (**self).metadata(entry);
    }

    fn enter(&mut self, entry: LogEntry) {
        (**self).enter(entry);
    }

    fn leave(&mut self) {
        (**self).leave();
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

impl<T: TreeLog + ?Sized> TreeLog for Box<T> {
    fn log(&mut self, entry: LogEntry) {
        (**self).log(entry);
    }

    fn metadata(&mut self, entry: LogEntry) {
        (**self).metadata(entry);
    }

    fn enter(&mut self, entry: LogEntry) {
        (**self).enter(entry);
    }

    fn leave(&mut self) {
        (**self).leave();
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
