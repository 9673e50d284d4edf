use serde::{Deserialize, Serialize};

/// A Viber user as reported by webhook callbacks.
///
/// The same shape arrives as the `sender` of a message event and as the `user`
/// of a conversation_started event. Outbound messages reuse it as their sender,
/// in which case only `name` and `avatar` are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Strip everything the platform does not accept in an outbound sender.
    pub fn as_sender(&self) -> Self {
        Self {
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            ..Default::default()
        }
    }
}

/// Outbound messages carry the bot's identity in the same shape.
pub type Sender = User;

/// Opaque identifier the platform assigns to a sent or received message.
pub type MessageToken = u64;
