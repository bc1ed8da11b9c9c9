//! Scope Log Server (scopelog)
//!
//! Accepts TCP connections carrying newline-delimited log directives and
//! folds each connection into its own hierarchical tree of scopes.
//!
//! Data flows one way: [`server`] accepts a connection, a [`source`] yields
//! its lines, the [`parser`] turns each line into a [`model::Directive`], and
//! the [`session`] applies directives to a [`tree::TreeLog`]. Trees are handed
//! to a [`view::Viewer`] as soon as the connection is accepted.

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod server;
pub mod session;
pub mod source;
pub mod tree;
pub mod view;

#[cfg(test)]
mod test_harness;
