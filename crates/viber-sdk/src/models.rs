//! Request and response bodies of the REST API

use serde::{Deserialize, Serialize};
use viber_core::MessageToken;

/// Response to `send_message` and `post`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: i32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub message_token: Option<MessageToken>,
}

/// Body of `set_webhook`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_types: Vec<String>,
}

/// Response to `set_webhook`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: i32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub event_types: Vec<String>,
}
