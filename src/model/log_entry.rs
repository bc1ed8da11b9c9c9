//! Log entry value type.
//!
//! A `LogEntry` is the payload of one tree node. Every field except the
//! timestamp is optional because every field is optional on the wire.

use crate::model::Sender;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

/// One immutable log record.
///
/// Built with [`LogEntry::new`] plus the consuming `with_*` methods; there are
/// no setters, so an entry cannot change once it has been handed to a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    timestamp: i64,
    sender: Option<Sender>,
    category: Option<String>,
    text: Option<String>,
}

impl LogEntry {
    /// Create an entry with only a timestamp (milliseconds since the Unix epoch).
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            sender: None,
            category: None,
            text: None,
        }
    }

    /// Create an entry stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    /// Attach a sender.
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Attach a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach message text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    // ===== Accessors (read-only) =====

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Timestamp as a UTC date-time, if it is within chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Producer of the entry, if the line named one.
    pub fn sender(&self) -> Option<&Sender> {
        self.sender.as_ref()
    }

    /// Category, if the line carried one.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Message text, if the line carried any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True when the entry carries a category or text.
    ///
    /// Leave and reset lines only produce a leaf when this holds.
    pub fn has_content(&self) -> bool {
        self.category.is_some() || self.text.is_some()
    }
}

/// Renders `(category) sender text`, omitting absent fields. The timestamp is
/// left to the caller because presentation of time varies.
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(category) = &self.category {
            parts.push(format!("({category})"));
        }
        if let Some(sender) = &self.sender {
            parts.push(format!("[{sender}]"));
        }
        if let Some(text) = &self.text {
            parts.push(text.clone());
        }
        f.write_str(&parts.join(" "))
    }
}

// ===== Tests =====
