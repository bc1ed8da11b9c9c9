//! Sender reference with identity-based equality.
//!
//! A sender is what a producer writes between brackets on the wire
//! (`[worker-3]@1f2e`). The display name is for humans; the identity is what
//! distinguishes two senders. Raw constructors are never exported - use the
//! smart constructor only.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to the component that produced a log entry.
///
/// Invariant: `display_name` is non-empty; `identity` is non-empty and, when it
/// came from the wire, consists of lowercase hexadecimal digits.
///
/// Equality and hashing use `identity` only. Two senders with different display
/// names but the same identity are the same sender.
#[derive(Debug, Clone, Serialize)]
pub struct Sender {
    display_name: String,
    identity: String,
    #[serde(skip)]
    explicit: bool,
}

impl Sender {
    /// Smart constructor.
    ///
    /// When `identity` is `None` the display name doubles as the identity.
    /// Hex identities are normalized to lowercase so `@1A2B` and `@1a2b`
    /// compare equal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSender::EmptyName` for an empty display name and
    /// `InvalidSender::Identity` when the identity is empty or not hexadecimal.
    pub fn new(
        display_name: impl Into<String>,
        identity: Option<&str>,
    ) -> Result<Self, InvalidSender> {
        let display_name = display_name.into();
        if display_name.is_empty() {
            return Err(InvalidSender::EmptyName);
        }

        let explicit = identity.is_some();
        let identity = match identity {
            Some(raw) => {
                if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(InvalidSender::Identity(raw.to_string()));
                }
                raw.to_ascii_lowercase()
            }
            None => display_name.clone(),
        };

        Ok(Self {
            display_name,
            identity,
            explicit,
        })
    }

    /// Human-readable name as written on the wire.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Identity used for equality and hashing.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// True when the wire carried an explicit `@identity`.
    pub fn has_explicit_identity(&self) -> bool {
        self.explicit
    }
}

impl PartialEq for Sender {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Sender {}

impl Hash for Sender {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_explicit_identity() {
            write!(f, "{}@{}", self.display_name, self.identity)
        } else {
            f.write_str(&self.display_name)
        }
    }
}

// ===== Error Types =====

/// Rejected sender construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSender {
    /// The display name was empty.
    #[error("Sender name cannot be empty")]
    EmptyName,
    /// The identity was empty or contained non-hex characters.
    #[error("Sender identity must be hexadecimal, got {0:?}")]
    Identity(String),
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sender_without_identity_uses_display_name() {
        let sender = Sender::new("worker", None).unwrap();
        assert_eq!(sender.identity(), "worker");
        assert!(!sender.has_explicit_identity());
    }

    #[test]
    fn sender_rejects_empty_name() {
        assert_eq!(Sender::new("", None), Err(InvalidSender::EmptyName));
    }

    #[test]
    fn sender_rejects_non_hex_identity() {
        let result = Sender::new("worker", Some("xyz"));
        assert!(matches!(result, Err(InvalidSender::Identity(_))));
    }

    #[test]
    fn sender_rejects_empty_identity() {
        let result = Sender::new("worker", Some(""));
        assert!(matches!(result, Err(InvalidSender::Identity(_))));
    }

    #[test]
    fn identity_is_normalized_to_lowercase() {
        let sender = Sender::new("worker", Some("1A2B")).unwrap();
        assert_eq!(sender.identity(), "1a2b");
    }

    #[test]
    fn equality_ignores_display_name() {
        let a = Sender::new("alpha", Some("beef")).unwrap();
        let b = Sender::new("beta", Some("BEEF")).unwrap();
        assert_eq!(a, b, "Same identity must compare equal");
    }

    #[test]
    fn equality_distinguishes_identity() {
        let a = Sender::new("worker", Some("1")).unwrap();
        let b = Sender::new("worker", Some("2")).unwrap();
        assert_ne!(a, b, "Same name with different identity must differ");
    }

    #[test]
    fn hash_follows_identity() {
        let mut set = HashSet::new();
        set.insert(Sender::new("alpha", Some("beef")).unwrap());
        set.insert(Sender::new("beta", Some("beef")).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_shows_identity_only_when_explicit() {
        let plain = Sender::new("worker", None).unwrap();
        let tagged = Sender::new("worker", Some("ff")).unwrap();
        assert_eq!(plain.to_string(), "worker");
        assert_eq!(tagged.to_string(), "worker@ff");
    }
}
