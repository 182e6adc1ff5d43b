//! Strongly-typed ID types for domain entities.
//!
//! Locally-assigned IDs use ULID (Universally Unique Lexicographically
//! Sortable Identifier) format, providing both uniqueness and temporal
//! ordering. The backend store assigns its own opaque identifiers, which
//! are wrapped in [`StoreUserId`] without interpretation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed ID wrapper around ULID.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Creates a new ID with a randomly generated ULID.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Creates an ID from a ULID.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Returns the underlying ULID.
            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }

            /// Returns the prefix used for display formatting.
            #[must_use]
            pub const fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Try with prefix first
                let prefix_with_underscore = concat!($prefix, "_");
                let ulid_str = if let Some(stripped) = s.strip_prefix(prefix_with_underscore) {
                    stripped
                } else {
                    // Try parsing as raw ULID
                    s
                };

                Ulid::from_str(ulid_str)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        reason: e.to_string(),
                    })
            }
        }

        impl From<Ulid> for $name {
            fn from(ulid: Ulid) -> Self {
                Self(ulid)
            }
        }

        impl From<$name> for Ulid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a conversation session.
    SessionId,
    "sess"
);

define_id!(
    /// Unique identifier for a message within a conversation.
    MessageId,
    "msg"
);

/// Opaque user identifier assigned by the persistence backend.
///
/// The backend owns the format of this value; it is carried verbatim and
/// never parsed. A session holds at most one, assigned on the first
/// successful user-creation call and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreUserId(String);

impl StoreUserId {
    /// Wraps a backend-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StoreUserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<StoreUserId> for String {
    fn from(id: StoreUserId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_display_format() {
        let id = SessionId::new();
        let display = id.to_string();
        assert!(display.starts_with("sess_"));
    }

    #[test]
    fn message_id_display_format() {
        let id = MessageId::new();
        let display = id.to_string();
        assert!(display.starts_with("msg_"));
    }

    #[test]
    fn parse_with_prefix() {
        let id = SessionId::new();
        let display = id.to_string();
        let parsed: SessionId = display.parse().expect("should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_without_prefix() {
        let ulid = Ulid::new();
        let id: MessageId = ulid.to_string().parse().expect("should parse");
        assert_eq!(id.as_ulid(), ulid);
    }

    #[test]
    fn parse_invalid_ulid() {
        let result: Result<SessionId, _> = "not_a_ulid".parse();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.id_type, "SessionId");
    }

    #[test]
    fn store_user_id_is_opaque() {
        let id = StoreUserId::new("64f1c0ffee");
        assert_eq!(id.as_str(), "64f1c0ffee");
        assert_eq!(id.to_string(), "64f1c0ffee");
    }

    #[test]
    fn store_user_id_serde_transparent() {
        let id = StoreUserId::new("abc123");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"abc123\"");
    }

    #[test]
    fn id_equality() {
        let ulid = Ulid::new();
        let id1 = MessageId::from_ulid(ulid);
        let id2 = MessageId::from_ulid(ulid);
        assert_eq!(id1, id2);
    }
}
