//! Rich media (carousel) and keyboard payloads
//!
//! Plain data carried inside outbound messages. The platform uses PascalCase
//! keys for these objects, unlike the rest of the API.

use serde::{Deserialize, Serialize};

use crate::message::MessageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "reply")]
    Reply,
    #[serde(rename = "open-url")]
    OpenUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "middle")]
    Center,
    #[serde(rename = "right")]
    Right,
}

/// A button inside a carousel or a keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Button {
    pub columns: u8,
    pub rows: u8,
    pub action_type: ActionType,
    pub action_body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size: Option<TextSize>,
    #[serde(rename = "TextVAlign", default, skip_serializing_if = "Option::is_none")]
    pub text_v_align: Option<TextVAlign>,
    #[serde(rename = "TextHAlign", default, skip_serializing_if = "Option::is_none")]
    pub text_h_align: Option<TextHAlign>,
}

impl Button {
    pub fn new(columns: u8, rows: u8, action_type: ActionType, action_body: impl Into<String>) -> Self {
        Self {
            columns,
            rows,
            action_type,
            action_body: action_body.into(),
            image: None,
            text: None,
            text_size: None,
            text_v_align: None,
            text_h_align: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_text_size(mut self, size: TextSize) -> Self {
        self.text_size = Some(size);
        self
    }

    pub fn with_alignment(mut self, vertical: TextVAlign, horizontal: TextHAlign) -> Self {
        self.text_v_align = Some(vertical);
        self.text_h_align = Some(horizontal);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RichMedia {
    #[serde(rename = "Type")]
    pub kind: MessageKind,
    pub buttons_group_columns: u8,
    pub buttons_group_rows: u8,
    pub bg_color: String,
    #[serde(rename = "tracking_data", default, skip_serializing_if = "Option::is_none")]
    pub tracking_data: Option<String>,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

/// A carousel message. Rich media cannot be posted to public chats, so it has
/// no `from` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichMediaMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub min_api_version: u32,
    pub rich_media: RichMedia,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl RichMediaMessage {
    pub fn new(columns: u8, rows: u8, bg_color: impl Into<String>) -> Self {
        Self {
            receiver: None,
            kind: MessageKind::RichMedia,
            min_api_version: 2,
            rich_media: RichMedia {
                kind: MessageKind::RichMedia,
                buttons_group_columns: columns,
                buttons_group_rows: rows,
                bg_color: bg_color.into(),
                tracking_data: None,
                buttons: Vec::new(),
            },
            alt_text: None,
        }
    }

    pub fn add_button(&mut self, button: Button) {
        self.rich_media.buttons.push(button);
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }
}

/// Custom keyboard attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Keyboard {
    #[serde(rename = "Type")]
    pub kind: String,
    pub default_height: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

impl Keyboard {
    pub fn new(bg_color: Option<String>, default_height: bool) -> Self {
        Self {
            kind: "keyboard".to_string(),
            default_height,
            bg_color,
            buttons: Vec::new(),
        }
    }

    pub fn add_button(&mut self, button: Button) {
        self.buttons.push(button);
    }
}
