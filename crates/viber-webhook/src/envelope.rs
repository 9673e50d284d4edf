//! Callback envelope
//!
//! The outer object of every callback. Nested `user`, `sender` and `message`
//! objects are kept as raw JSON: which concrete type they hold is only known
//! once the event kind (and for messages, the nested `type`) has been looked
//! at.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::{Result, WebhookError};

/// Decoded callback envelope. Only the fields relevant to `kind` are present.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "event")]
    pub kind: String,
    /// Unix epoch when the callback carries none
    #[serde(
        default = "crate::timestamp::epoch",
        deserialize_with = "crate::timestamp::deserialize"
    )]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message_token: Option<u64>,
    #[serde(default)]
    pub user_id: Option<String>,

    // failed
    #[serde(default, rename = "descr", alias = "description")]
    pub description: Option<String>,

    // conversation_started
    #[serde(default, rename = "type")]
    pub conversation_type: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub subscribed: Option<bool>,
    #[serde(default, rename = "user")]
    pub user_payload: Option<Box<RawValue>>,

    // message
    #[serde(default, rename = "sender")]
    pub sender_payload: Option<Box<RawValue>>,
    #[serde(default, rename = "message")]
    pub message_payload: Option<Box<RawValue>>,
}

/// Decode a raw callback body. Unknown fields are ignored.
pub fn decode(raw: &[u8]) -> Result<Envelope> {
    serde_json::from_slice(raw).map_err(|e| WebhookError::Decode(format!("envelope: {}", e)))
}

impl Envelope {
    /// Raw nested user payload, if any.
    pub fn user_json(&self) -> Option<&str> {
        self.user_payload.as_deref().map(RawValue::get)
    }

    /// Raw nested sender payload, if any.
    pub fn sender_json(&self) -> Option<&str> {
        self.sender_payload.as_deref().map(RawValue::get)
    }

    /// Raw nested message payload, if any.
    pub fn message_json(&self) -> Option<&str> {
        self.message_payload.as_deref().map(RawValue::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_delivery_event() {
        let envelope = decode(
            br#"{"event":"delivered","timestamp":1457764197627,"message_token":4912661846655238145,"user_id":"01234567890A="}"#,
        )
        .unwrap();

        assert_eq!(envelope.kind, "delivered");
        assert_eq!(envelope.timestamp.timestamp_millis(), 1_457_764_197_627);
        assert_eq!(envelope.message_token, Some(4_912_661_846_655_238_145));
        assert_eq!(envelope.user_id.as_deref(), Some("01234567890A="));
        assert!(envelope.message_payload.is_none());
        assert!(envelope.description.is_none());
    }

    #[test]
    fn test_decode_failed_event() {
        let envelope = decode(
            br#"{"event":"failed","timestamp":1457764197627,"message_token":1,"user_id":"U","descr":"user blocked"}"#,
        )
        .unwrap();
        assert_eq!(envelope.description.as_deref(), Some("user blocked"));
    }

    #[test]
    fn test_nested_payloads_stay_raw() {
        let envelope = decode(
            br#"{
                "event": "message",
                "timestamp": 1457764197627,
                "message_token": 4912661846655238145,
                "sender": { "id": "01234567890A=", "name": "John McClane", "avatar": "http://avatar.example.com" },
                "message": { "type": "text", "text": "a message to the service", "tracking_data": "tracking data" }
            }"#,
        )
        .unwrap();

        let message = envelope.message_json().unwrap();
        assert!(message.contains("\"tracking_data\""));
        assert!(envelope.sender_json().unwrap().contains("John McClane"));
        assert!(envelope.user_json().is_none());
    }

    #[test]
    fn test_conversation_started_fields() {
        let envelope = decode(
            br#"{"event":"conversation_started","timestamp":1457764197627,"message_token":4912661846655238145,
                "type":"open","context":"context information","user":{"id":"01234567890A=","name":"John"},"subscribed":false}"#,
        )
        .unwrap();

        assert_eq!(envelope.conversation_type.as_deref(), Some("open"));
        assert_eq!(envelope.context.as_deref(), Some("context information"));
        assert_eq!(envelope.subscribed, Some(false));
        assert!(envelope.user_json().is_some());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let envelope = decode(
            br#"{"event":"seen","timestamp":1457764197,"user_id":"U1","chat_hostname":"SN-CHAT-01_","silent":false}"#,
        )
        .unwrap();
        assert_eq!(envelope.kind, "seen");
    }

    #[test]
    fn test_missing_timestamp_defaults_to_epoch() {
        let envelope = decode(br#"{"event":"seen","user_id":"U1"}"#).unwrap();
        assert_eq!(envelope.timestamp.timestamp(), 0);
    }

    #[test]
    fn test_null_nested_payload_is_absent() {
        let envelope =
            decode(br#"{"event":"message","timestamp":1457764197627,"message":null}"#).unwrap();
        assert!(envelope.message_payload.is_none());
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(decode(b"not json"), Err(WebhookError::Decode(_))));
        assert!(decode(b"").is_err());
        assert!(decode(br#"{"timestamp":1}"#).is_err());
        assert!(decode(br#"{"event":"seen","timestamp":null}"#).is_err());
        assert!(decode(br#"{"event":"seen","timestamp":1,"message_token":"abc"}"#).is_err());
        assert!(decode(br#"["event"]"#).is_err());
    }
}
