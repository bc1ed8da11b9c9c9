//! Error types for scopelog.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level binary error wrapping every startup failure
//!   - [`ServerError`] - Binding, address lookup and accept failures
//!   - [`ConfigError`](crate::config::ConfigError) - Unreadable or invalid config file
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing setup failures
//! - [`GrammarError`] - A wire line that does not match the line grammar
//!
//! # Error Scope
//!
//! Grammar errors are **session-local**: the session records the failure into
//! its own tree and closes, other sessions and the acceptor are unaffected.
//! The way a session ends is reported as a [`SessionEnd`](crate::session::SessionEnd)
//! value, not as an error. Accept failures are **fatal** to the whole server:
//! there is no retry.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::net::SocketAddr;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    /// The server failed to start or its accept loop died.
    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Failures of the connection acceptor.
///
/// None of these are ever produced by a session: session trouble stays inside
/// the session thread.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening endpoint could not be bound.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bound address could not be determined.
    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),

    /// Accepting a new connection failed. This stops the accept loop.
    #[error("Failed to accept connection on {addr}: {source}")]
    Accept {
        /// Address the server was listening on.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A line that does not match the wire grammar.
///
/// `column` is the byte offset into the line where the structural problem
/// starts, so operators can see which delimiter went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A run of `(` was never closed by `)`.
    #[error("Unterminated category starting at column {column}")]
    UnterminatedCategory {
        /// Byte offset of the first `(`.
        column: usize,
    },

    /// A run of `[` was never closed by `]`.
    #[error("Unterminated sender starting at column {column}")]
    UnterminatedSender {
        /// Byte offset of the first `[`.
        column: usize,
    },

    /// An `@` after a sender was not followed by hexadecimal digits.
    #[error("Expected hexadecimal sender identity after '@' at column {column}")]
    InvalidIdentity {
        /// Byte offset of the `@`.
        column: usize,
    },

    /// The timestamp digits do not fit in a signed 64-bit millisecond count.
    #[error("Timestamp at column {column} is out of range")]
    TimestampOutOfRange {
        /// Byte offset of the first digit.
        column: usize,
    },
}

impl GrammarError {
    /// Byte offset where the problem starts.
    pub fn column(&self) -> usize {
        match self {
            GrammarError::UnterminatedCategory { column }
            | GrammarError::UnterminatedSender { column }
            | GrammarError::InvalidIdentity { column }
            | GrammarError::TimestampOutOfRange { column } => *column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_error_reports_column() {
        let err = GrammarError::UnterminatedCategory { column: 3 };
        assert_eq!(err.column(), 3);
        assert!(err.to_string().contains("column 3"));
    }

    #[test]
    fn bind_error_mentions_address() {
        let err = ServerError::Bind {
            addr: "127.0.0.1:1".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().contains("127.0.0.1:1"));
    }

    #[test]
    fn server_error_converts_to_app_error() {
        let err: AppError = ServerError::LocalAddr(std::io::Error::other("boom")).into();
        assert!(matches!(err, AppError::Server(_)));
        assert!(err.to_string().starts_with("Server error"));
    }
}
