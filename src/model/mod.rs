//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod directive;
pub mod error;
pub mod identifiers;
pub mod log_entry;

// Re-export for convenience
pub use directive::{Action, Directive};
pub use error::{AppError, GrammarError, ServerError};
pub use identifiers::{InvalidSender, Sender};
pub use log_entry::LogEntry;
