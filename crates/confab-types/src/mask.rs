//! Conversation templates ("masks").
//!
//! A mask supplies a display name, an avatar, and seed messages used to
//! pre-populate a session created from it. Masks are fetched, never mutated.

use serde::{Deserialize, Serialize};

use crate::id::MaskId;
use crate::message::Message;

/// Topic given to sessions that are not created from a named mask.
pub const DEFAULT_TOPIC: &str = "New Conversation";

/// Avatar reference used by the empty mask.
pub const DEFAULT_MASK_AVATAR: &str = "gpt-bot";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub id: MaskId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    /// Seed messages, in their intended order.
    #[serde(default)]
    pub context: Vec<Message>,
}

fn default_avatar() -> String {
    DEFAULT_MASK_AVATAR.to_string()
}

impl Mask {
    /// The mask attached to sessions created without a template.
    pub fn empty() -> Self {
        Self {
            id: MaskId::new(),
            name: DEFAULT_TOPIC.to_string(),
            avatar: DEFAULT_MASK_AVATAR.to_string(),
            context: Vec::new(),
        }
    }

    /// A named mask whose context lives on the session server.
    pub fn named(id: impl Into<MaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: DEFAULT_MASK_AVATAR.to_string(),
            context: Vec::new(),
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }
}

impl Default for Mask {
    fn default() -> Self {
        Self::empty()
    }
}
