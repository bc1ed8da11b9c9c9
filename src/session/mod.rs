//! Per-connection session runner.
//!
//! A [`Session`] owns one [`LineSource`] and one [`TreeLog`]. It opens a
//! session scope, applies every line in arrival order, and closes that scope
//! exactly once no matter how the connection ends.
//!
//! # States
//!
//! ```text
//! Connected -> (Reading <-> Dispatching) -> Closed
//! ```
//!
//! Failures (bad grammar, read errors, abrupt disconnects) are written into
//! the session's own tree before it unwinds. Nothing a session does can reach
//! another session.

use crate::model::{Directive, GrammarError, LogEntry};
use crate::parser;
use crate::source::LineSource;
use crate::tree::TreeLog;
use chrono::{SecondsFormat, Utc};
use std::io;
use tracing::{debug, info, info_span, warn};

/// Category of the scope that wraps a whole session.
pub const CONNECTION_CATEGORY: &str = "connection";

/// Category of the informational entries a session writes about itself.
pub const SESSION_CATEGORY: &str = "session";

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed, session scope not yet opened.
    Connected,
    /// Blocked on the next line.
    Reading,
    /// Applying a parsed line to the sink.
    Dispatching,
    /// Session scope closed; the session will not touch its sink again.
    Closed,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer sent `CLOSE`.
    ProtocolTermination,
    /// The peer closed the stream without `CLOSE`.
    PeerDisconnect,
    /// A line did not match the grammar.
    Grammar(GrammarError),
    /// Reading from the connection failed.
    ReadFailed {
        /// I/O error kind reported by the transport.
        kind: io::ErrorKind,
        /// Transport error message.
        message: String,
    },
}

impl SessionEnd {
    /// True for the two orderly endings: `CLOSE` and end of stream.
    pub fn is_graceful(&self) -> bool {
        matches!(
            self,
            SessionEnd::ProtocolTermination | SessionEnd::PeerDisconnect
        )
    }
}

/// Per-session directive counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Lines read from the connection, including the final one.
    pub lines_read: usize,
    /// Plain log lines applied.
    pub logged: usize,
    /// Scopes entered by the peer (the session scope is not counted).
    pub entered: usize,
    /// Leave directives applied.
    pub left: usize,
    /// Reset directives applied.
    pub resets: usize,
}

/// Outcome of [`Session::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Peer name the session was opened for.
    pub peer: String,
    /// Why the session stopped.
    pub end: SessionEnd,
    /// What the session applied.
    pub stats: SessionStats,
}

/// Runner binding one connection to one sink.
///
/// The session is the only writer of its sink, so it takes no locks of its
/// own.
#[derive(Debug)]
pub struct Session<L: LineSource, S: TreeLog> {
    source: L,
    sink: S,
    state: SessionState,
    stats: SessionStats,
    end: Option<SessionEnd>,
}

impl<L: LineSource, S: TreeLog> Session<L, S> {
    /// Bind `source` to `sink`.
    pub fn new(source: L, sink: S) -> Self {
        Self {
            source,
            sink,
            state: SessionState::Connected,
            stats: SessionStats::default(),
            end: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Give back the sink, e.g. to inspect it after `run`.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Drive the connection to completion.
    ///
    /// Blocks until the peer sends `CLOSE`, disconnects, sends a line that
    /// does not parse, or the read fails. Calling `run` again on a closed
    /// session returns the first outcome and writes nothing.
    pub fn run(&mut self) -> SessionReport {
        let peer = self.source.peer();
        let span = info_span!("session", peer = %peer);
        let _guard = span.enter();

        if let Some(end) = &self.end {
            return SessionReport {
                peer,
                end: end.clone(),
                stats: self.stats,
            };
        }

        self.open(&peer);
        let end = self.read_loop(&peer);

        // Closes the scope opened in `open`, whatever happened in between.
        self.sink.leave();
        self.state = SessionState::Closed;
        self.end = Some(end.clone());

        info!(end = ?end, lines = self.stats.lines_read, "Session closed");
        SessionReport {
            peer,
            end,
            stats: self.stats,
        }
    }

    fn open(&mut self, peer: &str) {
        info!("Session opened");
        self.sink.enter(
            LogEntry::now()
                .with_category(CONNECTION_CATEGORY)
                .with_text(format!("Connection received from {peer}")),
        );
        self.sink
            .metadata(LogEntry::now().with_category("peer").with_text(peer));
        self.sink.metadata(
            LogEntry::now()
                .with_category("connected_at")
                .with_text(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }

    fn read_loop(&mut self, peer: &str) -> SessionEnd {
        loop {
            self.state = SessionState::Reading;
            let line = match self.source.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.note(format!("Connection closed abruptly by {peer}"));
                    return SessionEnd::PeerDisconnect;
                }
                Err(err) => {
                    warn!(error = %err, "Connection read failed");
                    self.note(format!("Connection read failed: {err}"));
                    return SessionEnd::ReadFailed {
                        kind: err.kind(),
                        message: err.to_string(),
                    };
                }
            };

            self.stats.lines_read += 1;
            self.state = SessionState::Dispatching;

            match parser::parse(&line) {
                Err(err) => {
                    warn!(error = %err, line = %line, "Parser failure");
                    self.note(format!("Parser failure: {err}: {line:?}"));
                    return SessionEnd::Grammar(err);
                }
                Ok(Directive::Terminate) => {
                    if let Err(err) = self.source.close_read() {
                        warn!(error = %err, "Failed to shut down read side");
                    }
                    self.note("Connection closed gracefully at client request".to_string());
                    return SessionEnd::ProtocolTermination;
                }
                Ok(directive) => self.dispatch(directive),
            }
        }
    }

    fn dispatch(&mut self, directive: Directive) {
        debug!(action = ?directive.action(), "Applying directive");
        match directive {
            Directive::Enter(entry) => {
                self.stats.entered += 1;
                self.sink.enter(entry);
            }
            Directive::Log(entry) => {
                self.stats.logged += 1;
                self.sink.log(entry);
            }
            Directive::Leave(entry) => {
                if entry.has_content() {
                    self.sink.log(entry);
                }
                self.stats.left += 1;
                self.sink.leave();
            }
            Directive::Reset(entry) => {
                if entry.has_content() {
                    self.sink.log(entry);
                }
                self.stats.resets += 1;
                self.sink.reset();
            }
            // Handled by the read loop before dispatch.
            Directive::Terminate => {}
        }
    }

    fn note(&mut self, text: String) {
        self.sink.log(
            LogEntry::now()
                .with_category(SESSION_CATEGORY)
                .with_text(text),
        );
    }
}
