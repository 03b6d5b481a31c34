//! Opaque identifiers for sessions, messages, and masks.
//!
//! The session service stores whatever identity the client hands it, so ids
//! are kept as opaque strings on the wire. Fresh ids are UUID v7 (time-sortable).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a fresh identifier using UUID v7.
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

opaque_id!(
    /// Identity of a persisted conversation.
    SessionId
);

opaque_id!(
    /// Identity of a single message within a session.
    MessageId
);

opaque_id!(
    /// Identity of a conversation template.
    MaskId
);
