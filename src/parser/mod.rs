//! Line grammar parser.
//!
//! This module provides pure parsing functions for converting one wire line
//! into a [`Directive`].
//!
//! # Grammar
//!
//! Fields appear left to right and every one of them is optional:
//!
//! ```text
//! [marker-run] [timestamp] [(category)] [[sender]][@hex-identity] [text]
//! ```
//!
//! - marker run: any mix of `>`, `<`, `!`; only the first character decides
//!   the action, the rest of the run is consumed without further meaning
//! - timestamp: decimal milliseconds since the Unix epoch
//! - category: wrapped in one or more `(` ... `)`
//! - sender: wrapped in one or more `[` ... `]`, optionally followed by `@`
//!   and hexadecimal digits
//! - text: whatever remains, with leading whitespace removed
//!
//! The exact line `CLOSE` is the terminate directive and carries no entry.

use crate::model::{Action, Directive, GrammarError, LogEntry, Sender};
use chrono::Utc;

/// The only line that ends a session gracefully.
pub const TERMINATE_LINE: &str = "CLOSE";

const MARKER_ENTER: u8 = b'>';
const MARKER_LEAVE: u8 = b'<';
const MARKER_RESET: u8 = b'!';

/// Parse a line, stamping entries without a wire timestamp with the current time.
///
/// # Errors
///
/// Returns `GrammarError` when the line's structure is invalid.
pub fn parse(line: &str) -> Result<Directive, GrammarError> {
    parse_line(line, Utc::now().timestamp_millis())
}

/// Parse a line into a directive.
///
/// This is the main entry point for parsing. It is a pure function:
/// `received_at` is used as the timestamp when the line carries none.
/// A trailing `\n` or `\r\n` is ignored.
///
/// # Errors
///
/// Returns `GrammarError` when a delimiter is left open, an `@` is not
/// followed by hex digits, or the timestamp overflows.
pub fn parse_line(line: &str, received_at: i64) -> Result<Directive, GrammarError> {
    let line = strip_line_ending(line);
    if line == TERMINATE_LINE {
        return Ok(Directive::Terminate);
    }

    let mut scanner = Scanner::new(line);

    let action = scanner.marker();
    scanner.skip_whitespace();

    let timestamp = scanner.timestamp()?.unwrap_or(received_at);
    scanner.skip_whitespace();

    let category = scanner
        .delimited(b'(', b')')
        .map_err(|column| GrammarError::UnterminatedCategory { column })?;
    scanner.skip_whitespace();

    let sender = scanner.sender()?;
    scanner.skip_whitespace();

    let text = scanner.rest();

    let mut entry = LogEntry::new(timestamp);
    if let Some(sender) = sender {
        entry = entry.with_sender(sender);
    }
    if let Some(category) = category {
        entry = entry.with_category(category);
    }
    if let Some(text) = text {
        entry = entry.with_text(text);
    }

    Ok(Directive::from_parts(action, entry))
}

/// Count the leading marker characters of a line.
///
/// The count is informational: a run of three `>` still enters a single
/// scope.
pub fn marker_run_len(line: &str) -> usize {
    line.bytes().take_while(|b| is_marker(*b)).count()
}

fn is_marker(b: u8) -> bool {
    matches!(b, MARKER_ENTER | MARKER_LEAVE | MARKER_RESET)
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Byte cursor over one line.
///
/// All delimiters are ASCII, so every position the scanner stops at is a
/// valid `str` boundary.
struct Scanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.line.as_bytes().get(self.pos).copied()
    }

    fn bump_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn skip_whitespace(&mut self) {
        self.bump_while(|b| b.is_ascii_whitespace());
    }

    fn marker(&mut self) -> Action {
        let action = match self.peek() {
            Some(MARKER_ENTER) => Action::Enter,
            Some(MARKER_LEAVE) => Action::Leave,
            Some(MARKER_RESET) => Action::Reset,
            _ => return Action::None,
        };
        self.bump_while(is_marker);
        action
    }

    fn timestamp(&mut self) -> Result<Option<i64>, GrammarError> {
        let start = self.pos;
        if self.bump_while(|b| b.is_ascii_digit()) == 0 {
            return Ok(None);
        }
        self.line[start..self.pos]
            .parse::<i64>()
            .map(Some)
            .map_err(|_| GrammarError::TimestampOutOfRange { column: start })
    }

    /// Parse `open+ content close+`. Returns the opening column on failure.
    fn delimited(&mut self, open: u8, close: u8) -> Result<Option<&'a str>, usize> {
        if self.peek() != Some(open) {
            return Ok(None);
        }
        let column = self.pos;
        self.bump_while(|b| b == open);

        let line = self.line;
        let content_start = self.pos;
        let Some(offset) = line[content_start..].bytes().position(|b| b == close) else {
            return Err(column);
        };
        let content = &line[content_start..content_start + offset];
        self.pos = content_start + offset;
        self.bump_while(|b| b == close);

        Ok((!content.is_empty()).then_some(content))
    }

    fn sender(&mut self) -> Result<Option<Sender>, GrammarError> {
        let line = self.line;
        let name = self
            .delimited(b'[', b']')
            .map_err(|column| GrammarError::UnterminatedSender { column })?;
        // `@` only means identity right after `[name]`; otherwise it is text.
        let Some(name) = name else {
            return Ok(None);
        };

        let mut identity = None;
        if self.peek() == Some(b'@') {
            let column = self.pos;
            self.pos += 1;
            let start = self.pos;
            if self.bump_while(|b| b.is_ascii_hexdigit()) == 0 {
                return Err(GrammarError::InvalidIdentity { column });
            }
            identity = Some(&line[start..self.pos]);
        }

        Sender::new(name, identity)
            .map(Some)
            .map_err(|_| GrammarError::InvalidIdentity { column: self.pos })
    }

    fn rest(&self) -> Option<&'a str> {
        let line = self.line;
        let rest = &line[self.pos..];
        (!rest.is_empty()).then_some(rest)
    }
}
