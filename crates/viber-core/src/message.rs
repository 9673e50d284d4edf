//! Message model
//!
//! Every message is a [`MessageContent`] variant plus the [`OutboundFields`]
//! shared by all variants. On the wire the variant is discriminated by the
//! `type` key and both parts are flattened into one JSON object:
//!
//! ```json
//! {
//!     "receiver": "01234567890A=",
//!     "min_api_version": 1,
//!     "sender": { "name": "John McClane", "avatar": "http://avatar.example.com" },
//!     "tracking_data": "tracking data",
//!     "type": "text",
//!     "text": "a message from pa"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::rich_media::Keyboard;
use crate::types::Sender;

/// Message types known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Url,
    Picture,
    Video,
    File,
    Location,
    Contact,
    Sticker,
    RichMedia,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Picture => "picture",
            Self::Video => "video",
            Self::File => "file",
            Self::Location => "location",
            Self::Contact => "contact",
            Self::Sticker => "sticker",
            Self::RichMedia => "rich_media",
        }
    }

    /// Parse a lower-case wire name. Unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "url" => Some(Self::Url),
            "picture" => Some(Self::Picture),
            "video" => Some(Self::Video),
            "file" => Some(Self::File),
            "location" => Some(Self::Location),
            "contact" => Some(Self::Contact),
            "sticker" => Some(Self::Sticker),
            "rich_media" => Some(Self::RichMedia),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routing and presentation fields shared by every message variant.
///
/// `receiver` and `from` only make sense for outbound messages. They are
/// cleared on anything decoded from a webhook and on in-place replies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_api_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Sender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Keyboard>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "media")]
    pub media_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureMessage {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "media")]
    pub media_url: String,
    #[serde(rename = "thumbnail", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "media")]
    pub media_url: String,
    #[serde(rename = "thumbnail", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

/// The variant part of a message, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text(TextMessage),
    Url(UrlMessage),
    Picture(PictureMessage),
    Video(VideoMessage),
}

impl MessageContent {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text(_) => MessageKind::Text,
            Self::Url(_) => MessageKind::Url,
            Self::Picture(_) => MessageKind::Picture,
            Self::Video(_) => MessageKind::Video,
        }
    }
}

impl From<TextMessage> for MessageContent {
    fn from(m: TextMessage) -> Self {
        Self::Text(m)
    }
}

impl From<UrlMessage> for MessageContent {
    fn from(m: UrlMessage) -> Self {
        Self::Url(m)
    }
}

impl From<PictureMessage> for MessageContent {
    fn from(m: PictureMessage) -> Self {
        Self::Picture(m)
    }
}

impl From<VideoMessage> for MessageContent {
    fn from(m: VideoMessage) -> Self {
        Self::Video(m)
    }
}

/// A complete message: shared outbound fields plus one content variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(flatten)]
    pub outbound: OutboundFields,
    #[serde(flatten)]
    pub content: MessageContent,
}

impl Message {
    pub fn new(content: impl Into<MessageContent>) -> Self {
        Self {
            outbound: OutboundFields::default(),
            content: content.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(TextMessage { text: text.into() })
    }

    pub fn url(text: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self::new(UrlMessage {
            text: text.into(),
            media_url: media_url.into(),
        })
    }

    pub fn picture(
        text: impl Into<String>,
        media_url: impl Into<String>,
        thumbnail_url: Option<String>,
    ) -> Self {
        Self::new(PictureMessage {
            text: text.into(),
            media_url: media_url.into(),
            thumbnail_url,
        })
    }

    pub fn video(media_url: impl Into<String>, size_bytes: u64) -> Self {
        Self::new(VideoMessage {
            media_url: media_url.into(),
            size_bytes,
            ..Default::default()
        })
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.outbound.receiver = Some(receiver.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.outbound.from = Some(from.into());
        self
    }

    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.outbound.sender = Some(sender);
        self
    }

    pub fn with_tracking_data(mut self, tracking_data: impl Into<String>) -> Self {
        self.outbound.tracking_data = Some(tracking_data.into());
        self
    }

    pub fn with_min_api_version(mut self, version: u32) -> Self {
        self.outbound.min_api_version = Some(version);
        self
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.outbound.keyboard = Some(keyboard);
        self
    }

    pub fn kind(&self) -> MessageKind {
        self.content.kind()
    }

    /// Text body, if the variant has a non-empty one.
    pub fn body_text(&self) -> Option<&str> {
        let text = match &self.content {
            MessageContent::Text(m) => &m.text,
            MessageContent::Url(m) => &m.text,
            MessageContent::Picture(m) => &m.text,
            MessageContent::Video(m) => &m.text,
        };
        (!text.is_empty()).then_some(text.as_str())
    }

    /// Drop `receiver` and `from`.
    pub fn clear_routing(&mut self) {
        self.outbound.receiver = None;
        self.outbound.from = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;
    use serde_json::json;

    #[test]
    fn test_message_kind_names() {
        for kind in [
            MessageKind::Text,
            MessageKind::Url,
            MessageKind::Picture,
            MessageKind::Video,
            MessageKind::File,
            MessageKind::Location,
            MessageKind::Contact,
            MessageKind::Sticker,
            MessageKind::RichMedia,
        ] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::parse("carousel"), None);
        assert_eq!(MessageKind::parse(""), None);
    }

    #[test]
    fn test_text_message_wire_shape() {
        let msg = Message::text("a message from pa")
            .with_receiver("01234567890A=")
            .with_min_api_version(1)
            .with_sender(User::new("John McClane").with_avatar("http://avatar.example.com"))
            .with_tracking_data("tracking data");

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "receiver": "01234567890A=",
                "min_api_version": 1,
                "sender": { "name": "John McClane", "avatar": "http://avatar.example.com" },
                "tracking_data": "tracking data",
                "type": "text",
                "text": "a message from pa"
            })
        );
    }

    #[test]
    fn test_video_field_names() {
        let mut msg = Message::video("http://example.com/v.mp4", 10_000);
        if let MessageContent::Video(ref mut v) = msg.content {
            v.duration_seconds = Some(10);
            v.thumbnail_url = Some("http://example.com/t.jpg".to_string());
        }

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "video");
        assert_eq!(value["media"], "http://example.com/v.mp4");
        assert_eq!(value["thumbnail"], "http://example.com/t.jpg");
        assert_eq!(value["size"], 10_000);
        assert_eq!(value["duration"], 10);
        assert!(value.get("text").is_none());
    }

    #[test]
    fn test_tagged_deserialization() {
        let msg: Message = serde_json::from_value(json!({
            "type": "picture",
            "text": "look",
            "media": "http://example.com/p.jpg",
            "tracking_data": "t-1"
        }))
        .unwrap();

        assert_eq!(msg.kind(), MessageKind::Picture);
        assert_eq!(msg.outbound.tracking_data.as_deref(), Some("t-1"));
        assert_eq!(
            msg.content,
            MessageContent::Picture(PictureMessage {
                text: "look".to_string(),
                media_url: "http://example.com/p.jpg".to_string(),
                thumbnail_url: None,
            })
        );
    }

    #[test]
    fn test_clear_routing() {
        let mut msg = Message::text("hi").with_receiver("r").with_from("f");
        msg.clear_routing();

        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("receiver").is_none());
        assert!(value.get("from").is_none());
        assert_eq!(value["text"], "hi");
    }

    #[test]
    fn test_body_text() {
        assert_eq!(Message::text("hi").body_text(), Some("hi"));
        assert_eq!(Message::video("http://v", 1).body_text(), None);
    }
}
