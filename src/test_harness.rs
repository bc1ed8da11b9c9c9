//! Test doubles shared by the whitebox tests.
//!
//! Provides a sink that records every call it receives (while still building a
//! real tree) and line sources that fail on demand.

use crate::model::LogEntry;
use crate::source::LineSource;
use crate::tree::{NodeId, ScopeTree, TreeLog};
use std::collections::VecDeque;
use std::io;

/// One call received by [`RecordingTreeLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Log(LogEntry),
    Metadata(LogEntry),
    Enter(LogEntry),
    Leave,
    Reset,
}

/// Sink that records calls and applies them to an inner [`ScopeTree`].
#[derive(Debug, Default)]
pub struct RecordingTreeLog {
    pub calls: Vec<Call>,
    pub tree: ScopeTree,
}

impl RecordingTreeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leave_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Leave).count()
    }

    pub fn enter_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Enter(_)))
            .count()
    }

    /// Texts of the children of `id`, `None` entries rendered as `""`.
    pub fn child_texts(&self, id: NodeId) -> Vec<String> {
        self.tree
            .children(id)
            .iter()
            .map(|child| {
                self.tree
                    .node(*child)
                    .and_then(|n| n.payload())
                    .and_then(|p| p.text())
                    .unwrap_or("")
                    .to_string()
            })
            .collect()
    }

    /// The session scope: first child of the root.
    pub fn session_scope(&self) -> NodeId {
        self.tree.children(NodeId::ROOT)[0]
    }
}

impl TreeLog for RecordingTreeLog {
    fn log(&mut self, entry: LogEntry) {
        self.calls.push(Call::Log(entry.clone()));
        self.tree.log(entry);
    }

    fn metadata(&mut self, entry: LogEntry) {
        self.calls.push(Call::Metadata(entry.clone()));
        self.tree.metadata(entry);
    }

    fn enter(&mut self, entry: LogEntry) {
        self.calls.push(Call::Enter(entry.clone()));
        self.tree.enter(entry);
    }

    fn leave(&mut self) {
        self.calls.push(Call::Leave);
        self.tree.leave();
    }

    fn reset(&mut self) {
        self.calls.push(Call::Reset);
        self.tree.reset();
    }
}

/// Scripted line source: yields queued results, then end of stream.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pub script: VecDeque<io::Result<Option<String>>>,
    pub close_calls: usize,
    pub fail_close: bool,
}

impl ScriptedSource {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            script: lines.iter().map(|l| Ok(Some(l.to_string()))).collect(),
            ..Self::default()
        }
    }

    pub fn then_error(mut self, kind: io::ErrorKind) -> Self {
        self.script
            .push_back(Err(io::Error::new(kind, "scripted failure")));
        self
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.script.pop_front().unwrap_or(Ok(None))
    }

    fn close_read(&mut self) -> io::Result<()> {
        self.close_calls += 1;
        if self.fail_close {
            Err(io::Error::other("close failed"))
        } else {
            Ok(())
        }
    }

    fn peer(&self) -> String {
        "10.1.2.3:4567".to_string()
    }
}
