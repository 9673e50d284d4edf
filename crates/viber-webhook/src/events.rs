//! Callback event types and handler registration
//!
//! Each event kind has one optional slot in a [`HandlerSet`]. Handlers are
//! async closures; unset slots are skipped without error.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::Arc;
use viber_core::{Message, MessageToken, User};

/// Callback event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Subscribed,
    Unsubscribed,
    ConversationStarted,
    Delivered,
    Seen,
    Failed,
    Message,
    /// Sent once by the platform when the webhook is registered
    Webhook,
    Unknown,
}

impl EventKind {
    pub fn parse(s: &str) -> Self {
        match s {
            "subscribed" => Self::Subscribed,
            "unsubscribed" => Self::Unsubscribed,
            "conversation_started" => Self::ConversationStarted,
            "delivered" => Self::Delivered,
            "seen" => Self::Seen,
            "failed" => Self::Failed,
            "message" => Self::Message,
            "webhook" => Self::Webhook,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::ConversationStarted => "conversation_started",
            Self::Delivered => "delivered",
            Self::Seen => "seen",
            Self::Failed => "failed",
            Self::Message => "message",
            Self::Webhook => "webhook",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// subscribed / unsubscribed / delivered / seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    pub user_id: String,
    pub message_token: Option<MessageToken>,
    pub timestamp: DateTime<Utc>,
}

/// Delivery failure of a previously sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEvent {
    pub user_id: String,
    pub message_token: Option<MessageToken>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// A user opened a conversation with the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStartedEvent {
    pub user: User,
    pub conversation_type: Option<String>,
    pub context: Option<String>,
    pub subscribed: bool,
    pub message_token: Option<MessageToken>,
    pub timestamp: DateTime<Utc>,
}

/// A message sent by a user to the bot
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub sender: User,
    pub message: Message,
    pub message_token: Option<MessageToken>,
    pub timestamp: DateTime<Utc>,
}

pub(crate) type UserEventHandler = Arc<dyn Fn(UserEvent) -> BoxFuture<'static, ()> + Send + Sync>;
pub(crate) type FailedHandler = Arc<dyn Fn(FailedEvent) -> BoxFuture<'static, ()> + Send + Sync>;
pub(crate) type ConversationStartedHandler =
    Arc<dyn Fn(ConversationStartedEvent) -> BoxFuture<'static, Option<Message>> + Send + Sync>;
pub(crate) type MessageHandler = Arc<dyn Fn(MessageEvent) -> BoxFuture<'static, ()> + Send + Sync>;

fn boxed<E, F, Fut>(f: F) -> Arc<dyn Fn(E) -> BoxFuture<'static, Fut::Output> + Send + Sync>
where
    E: 'static,
    F: Fn(E) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
{
    Arc::new(move |event| f(event).boxed())
}

/// One optional handler per callback event kind.
///
/// The conversation_started handler is awaited before the HTTP response is
/// written and may return a message to send back in the response body. All
/// other handlers run on spawned tasks.
#[derive(Clone, Default)]
pub struct HandlerSet {
    pub(crate) subscribed: Option<UserEventHandler>,
    pub(crate) unsubscribed: Option<UserEventHandler>,
    pub(crate) delivered: Option<UserEventHandler>,
    pub(crate) seen: Option<UserEventHandler>,
    pub(crate) failed: Option<FailedHandler>,
    pub(crate) conversation_started: Option<ConversationStartedHandler>,
    pub(crate) message: Option<MessageHandler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_subscribed<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(UserEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.subscribed = Some(boxed(f));
        self
    }

    pub fn on_unsubscribed<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(UserEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.unsubscribed = Some(boxed(f));
        self
    }

    pub fn on_delivered<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(UserEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.delivered = Some(boxed(f));
        self
    }

    pub fn on_seen<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(UserEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.seen = Some(boxed(f));
        self
    }

    pub fn on_failed<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(FailedEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.failed = Some(boxed(f));
        self
    }

    pub fn on_conversation_started<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ConversationStartedEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Message>> + Send + 'static,
    {
        self.conversation_started = Some(boxed(f));
        self
    }

    pub fn on_message<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(MessageEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.message = Some(boxed(f));
        self
    }

    /// Event kinds with a handler wired.
    pub fn registered(&self) -> Vec<EventKind> {
        [
            (EventKind::Subscribed, self.subscribed.is_some()),
            (EventKind::Unsubscribed, self.unsubscribed.is_some()),
            (EventKind::ConversationStarted, self.conversation_started.is_some()),
            (EventKind::Delivered, self.delivered.is_some()),
            (EventKind::Seen, self.seen.is_some()),
            (EventKind::Failed, self.failed.is_some()),
            (EventKind::Message, self.message.is_some()),
        ]
        .into_iter()
        .filter_map(|(kind, set)| set.then_some(kind))
        .collect()
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("registered", &self.registered())
            .finish()
    }
}
