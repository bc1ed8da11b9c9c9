//! Forwarding sink with a replaceable target.
//!
//! Lets a producer start writing before anything is listening. With no target
//! set, every call lands on [`Target::NoOp`] and is discarded.

use crate::model::LogEntry;
use crate::tree::TreeLog;
use std::fmt;

/// Where a [`ForwardingTreeLog`] sends its calls.
#[derive(Default)]
pub enum Target {
    /// Discard everything.
    #[default]
    NoOp,
    /// Delegate to this sink.
    Sink(Box<dyn TreeLog + Send>),
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::NoOp => f.write_str("NoOp"),
            Target::Sink(_) => f.write_str("Sink(..)"),
        }
    }
}

impl TreeLog for Target {
    fn log(&mut self, entry: LogEntry) {
        if let Target::Sink(sink) = self {
            sink.log(entry);
        }
    }

    fn metadata(&mut self, entry: LogEntry) {
        if let Target::Sink(sink) = self {
            sink.metadata(entry);
        }
    }

    fn enter(&mut self, entry: LogEntry) {
        if let Target::Sink(sink) = self {
            sink.enter(entry);
        }
    }

    fn leave(&mut self) {
        if let Target::Sink(sink) = self {
            sink.leave();
        }
    }

    fn reset(&mut self) {
        if let Target::Sink(sink) = self {
            sink.reset();
        }
    }
}

/// Sink that delegates every call to its current [`Target`].
#[derive(Debug, Default)]
pub struct ForwardingTreeLog {
    target: Target,
}

impl ForwardingTreeLog {
    /// A forwarder with the no-op target.
    pub fn new() -> Self {
        Self::default()
    }

    /// A forwarder that starts out delegating to `sink`.
    pub fn with_target(sink: impl TreeLog + Send + 'static) -> Self {
        Self {
            target: Target::Sink(Box::new(sink)),
        }
    }

    /// Replace the target, returning the previous one.
    pub fn set_target(&mut self, sink: impl TreeLog + Send + 'static) -> Target {
        std::mem::replace(&mut self.target, Target::Sink(Box::new(sink)))
    }

    /// Switch back to the no-op target, returning the previous one.
    pub fn clear_target(&mut self) -> Target {
        std::mem::take(&mut self.target)
    }

    /// True unless the target is [`Target::NoOp`].
    pub fn has_target(&self) -> bool {
        matches!(self.target, Target::Sink(_))
    }
}

impl TreeLog for ForwardingTreeLog {
    fn log(&mut self, entry: LogEntry) {
        self.target.log(entry);
    }

    fn metadata(&mut self, entry: LogEntry) {
        self.target.metadata(entry);
    }

    fn enter(&mut self, entry: LogEntry) {
        self.target.enter(entry);
    }

    fn leave(&mut self) {
        self.target.leave();
    }

    fn reset(&mut self) {
        self.target.reset();
    }
}
