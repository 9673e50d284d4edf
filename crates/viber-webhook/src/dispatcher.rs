//! Event dispatch
//!
//! Routes a decoded envelope to the matching [`HandlerSet`] slot. Every
//! handler except conversation_started is spawned onto the runtime and not
//! awaited: there is no back-pressure, no completion tracking and no retry.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, warn};
use viber_core::{Message, MessageContent, MessageKind, OutboundFields, User};

use crate::envelope::Envelope;
use crate::events::{
    ConversationStartedEvent, EventKind, FailedEvent, HandlerSet, MessageEvent, UserEvent,
    UserEventHandler,
};
use crate::resolver::resolve_message_kind;
use crate::{Result, WebhookError};

/// Dispatcher over an immutable set of handlers
#[derive(Clone, Debug)]
pub struct Dispatcher {
    handlers: Arc<HandlerSet>,
}

impl Dispatcher {
    pub fn new(handlers: HandlerSet) -> Self {
        Self {
            handlers: Arc::new(handlers),
        }
    }

    pub fn handlers(&self) -> &HandlerSet {
        &self.handlers
    }

    /// Dispatch one envelope.
    ///
    /// Returns the reply for a conversation_started event, with `receiver`
    /// and `from` cleared. Every other kind returns `Ok(None)` once its
    /// handler has been spawned (or skipped). Errors cover malformed nested
    /// payloads and only concern this envelope.
    pub async fn dispatch(&self, envelope: Envelope) -> Result<Option<Message>> {
        let kind = EventKind::parse(&envelope.kind);

        match kind {
            EventKind::Subscribed => {
                self.spawn_user_event(kind, self.handlers.subscribed.as_ref(), &envelope)?
            }
            EventKind::Unsubscribed => {
                self.spawn_user_event(kind, self.handlers.unsubscribed.as_ref(), &envelope)?
            }
            EventKind::Delivered => {
                self.spawn_user_event(kind, self.handlers.delivered.as_ref(), &envelope)?
            }
            EventKind::Seen => self.spawn_user_event(kind, self.handlers.seen.as_ref(), &envelope)?,
            EventKind::Failed => self.spawn_failed(&envelope)?,
            EventKind::ConversationStarted => return self.conversation_started(envelope).await,
            EventKind::Message => self.spawn_message(&envelope)?,
            EventKind::Webhook => {
                debug!("Webhook registration callback acknowledged");
            }
            EventKind::Unknown => {
                debug!(event = %envelope.kind, "Ignoring unknown event");
            }
        }

        Ok(None)
    }

    fn spawn_user_event(
        &self,
        kind: EventKind,
        handler: Option<&UserEventHandler>,
        envelope: &Envelope,
    ) -> Result<()> {
        let Some(handler) = handler else {
            return Ok(());
        };

        let user_id = match (&envelope.user_id, kind) {
            (Some(id), _) => id.clone(),
            // subscribed callbacks carry the whole user object instead
            (None, EventKind::Subscribed) => decode_user(envelope.user_json(), "user")?
                .id
                .ok_or_else(|| WebhookError::Decode("subscribed event without user id".to_string()))?,
            (None, _) => {
                return Err(WebhookError::Decode(format!("{} event without user_id", kind)));
            }
        };

        let event = UserEvent {
            user_id,
            message_token: envelope.message_token,
            timestamp: envelope.timestamp,
        };
        spawn_handler(kind, handler(event));
        Ok(())
    }

    fn spawn_failed(&self, envelope: &Envelope) -> Result<()> {
        let Some(handler) = self.handlers.failed.as_ref() else {
            return Ok(());
        };

        let user_id = envelope
            .user_id
            .clone()
            .ok_or_else(|| WebhookError::Decode("failed event without user_id".to_string()))?;

        let event = FailedEvent {
            user_id,
            message_token: envelope.message_token,
            description: envelope.description.clone().unwrap_or_default(),
            timestamp: envelope.timestamp,
        };
        spawn_handler(EventKind::Failed, handler(event));
        Ok(())
    }

    async fn conversation_started(&self, envelope: Envelope) -> Result<Option<Message>> {
        let Some(handler) = self.handlers.conversation_started.as_ref() else {
            return Ok(None);
        };

        let user = decode_user(envelope.user_json(), "user")?;
        let event = ConversationStartedEvent {
            user,
            conversation_type: envelope.conversation_type,
            context: envelope.context,
            subscribed: envelope.subscribed.unwrap_or(false),
            message_token: envelope.message_token,
            timestamp: envelope.timestamp,
        };

        match AssertUnwindSafe(handler(event)).catch_unwind().await {
            Ok(Some(mut reply)) => {
                reply.clear_routing();
                Ok(Some(reply))
            }
            Ok(None) => Ok(None),
            Err(_) => {
                error!("conversation_started handler panicked");
                Ok(None)
            }
        }
    }

    fn spawn_message(&self, envelope: &Envelope) -> Result<()> {
        let Some(handler) = self.handlers.message.as_ref() else {
            return Ok(());
        };

        let sender = decode_user(envelope.sender_json(), "sender")?;
        let raw = envelope.message_json().unwrap_or_default();
        let kind = resolve_message_kind(raw.as_bytes());

        let message = match decode_message(&kind, raw) {
            Ok(message) => message,
            Err(WebhookError::UnrecognizedVariant(kind)) => {
                debug!(message_type = %kind, "Dropping message of unhandled type");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let event = MessageEvent {
            sender,
            message,
            message_token: envelope.message_token,
            timestamp: envelope.timestamp,
        };
        spawn_handler(EventKind::Message, handler(event));
        Ok(())
    }
}

fn spawn_handler(kind: EventKind, task: BoxFuture<'static, ()>) {
    debug!(event = %kind, "Spawning handler");
    tokio::spawn(async move {
        if AssertUnwindSafe(task).catch_unwind().await.is_err() {
            warn!(event = %kind, "Handler panicked");
        }
    });
}

fn decode_user(raw: Option<&str>, field: &str) -> Result<User> {
    let raw = raw.ok_or_else(|| WebhookError::Decode(format!("missing {} payload", field)))?;
    serde_json::from_str(raw).map_err(|e| WebhookError::Decode(format!("{}: {}", field, e)))
}

/// Decode a raw message payload into the variant named by `kind`.
///
/// Kinds without a variant (including the empty kind) yield
/// [`WebhookError::UnrecognizedVariant`]. The shared fields (`sender`,
/// `tracking_data`, `min_api_version`, `keyboard`) are kept; `receiver` and
/// `from` are never taken from an inbound payload.
pub fn decode_message(kind: &str, raw: &str) -> Result<Message> {
    let content = match MessageKind::parse(kind) {
        Some(MessageKind::Text) => MessageContent::Text(decode_variant(raw)?),
        Some(MessageKind::Url) => MessageContent::Url(decode_variant(raw)?),
        Some(MessageKind::Picture) => MessageContent::Picture(decode_variant(raw)?),
        Some(MessageKind::Video) => MessageContent::Video(decode_variant(raw)?),
        _ => return Err(WebhookError::UnrecognizedVariant(kind.to_string())),
    };

    let outbound: OutboundFields = decode_variant(raw)?;
    let mut message = Message { outbound, content };
    message.clear_routing();
    Ok(message)
}

fn decode_variant<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| WebhookError::Decode(format!("message: {}", e)))
}
