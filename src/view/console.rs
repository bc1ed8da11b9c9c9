//! Viewer that prints finished trees.
//!
//! Trees are registered as sessions start. [`ConsoleViewer::flush_closed`] is
//! polled by the binary and prints every tree whose session has ended since
//! the previous poll, each exactly once.

use crate::config::OutputFormat;
use crate::view::{render_json, render_text, TreeRegistry, Viewer};
use crate::tree::TreeHandle;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Registry plus once-only printing of closed trees.
#[derive(Debug)]
pub struct ConsoleViewer {
    registry: TreeRegistry,
    format: OutputFormat,
    printed: Mutex<HashSet<usize>>,
}

impl ConsoleViewer {
    /// A viewer printing in `format`.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            registry: TreeRegistry::new(),
            format,
            printed: Mutex::new(HashSet::new()),
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &TreeRegistry {
        &self.registry
    }

    /// Write every closed, not yet printed tree to `out`.
    ///
    /// Returns how many trees were written.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from `out`, or a JSON serialization error
    /// wrapped as `io::Error`.
    pub fn flush_closed<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut printed = self.printed.lock().unwrap_or_else(PoisonError::into_inner);
        let mut written = 0;

        for (index, entry) in self.registry.entries().into_iter().enumerate() {
            if printed.contains(&index) || !entry.tree.is_closed() {
                continue;
            }
            let body = match self.format {
                OutputFormat::Text => entry.tree.with_tree(render_text),
                OutputFormat::Json => entry.tree.with_tree(render_json)?,
            };
            writeln!(out, "== {} ==", entry.label)?;
            writeln!(out, "{body}")?;
            printed.insert(index);
            written += 1;
        }

        out.flush()?;
        Ok(written)
    }
}

impl Viewer for ConsoleViewer {
    fn register(&self, label: &str, tree: TreeHandle) {
        info!(label, "New session tree");
        self.registry.register(label, tree);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogEntry;
    use crate::tree::{shared_tree, TreeLog};

    #[test]
    fn open_trees_are_not_printed() {
        let viewer = ConsoleViewer::new(OutputFormat::Text);
        let (_writer, handle) = shared_tree();
        viewer.register("peer:1", handle);

        let mut out = Vec::new();
        assert_eq!(viewer.flush_closed(&mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn closed_tree_is_printed_once() {
        let viewer = ConsoleViewer::new(OutputFormat::Text);
        let (mut writer, handle) = shared_tree();
        viewer.register("peer:1", handle);
        writer.log(LogEntry::new(0).with_text("hi"));
        drop(writer);

        let mut out = Vec::new();
        assert_eq!(viewer.flush_closed(&mut out).unwrap(), 1);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "== peer:1 ==\n└─ [00:00:00.000] hi\n");

        let mut again = Vec::new();
        assert_eq!(viewer.flush_closed(&mut again).unwrap(), 0);
    }

    #[test]
    fn json_format_prints_json() {
        let viewer = ConsoleViewer::new(OutputFormat::Json);
        let (writer, handle) = shared_tree();
        viewer.register("peer:2", handle);
        drop(writer);

        let mut out = Vec::new();
        viewer.flush_closed(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let body = text.strip_prefix("== peer:2 ==\n").unwrap();
        let value: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(value["closed"], true);
    }

    #[test]
    fn registration_goes_to_registry() {
        let viewer = ConsoleViewer::new(OutputFormat::Text);
        let (_writer, handle) = shared_tree();
        viewer.register("x:1", handle);
        assert_eq!(viewer.registry().labels(), vec!["x:1"]);
    }
}
