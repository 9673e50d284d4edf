//! Inbound webhook processing for the Viber bot API
//!
//! A callback travels through four stages:
//! - **Signature verification**: HMAC-SHA256 of the raw body, keyed by the app token
//! - **Envelope decoding**: the outer event, with nested payloads left as raw JSON
//! - **Variant resolution**: peeks at the nested message `type` before decoding it
//! - **Dispatch**: hands the typed event to the matching slot of a [`HandlerSet`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use viber_webhook::{create_webhook_router, Dispatcher, HandlerSet, WebhookState};
//!
//! let handlers = HandlerSet::new()
//!     .on_seen(|event| async move {
//!         tracing::info!(user_id = %event.user_id, "message seen");
//!     })
//!     .on_message(|event| async move {
//!         tracing::info!(sender = %event.sender.name, kind = %event.message.kind(), "message");
//!     });
//!
//! let state = Arc::new(WebhookState::new("app-key", Dispatcher::new(handlers)));
//! let router = create_webhook_router("/viber/webhook", state);
//! ```

pub mod signature;
pub mod timestamp;
pub mod envelope;
pub mod resolver;
pub mod events;
pub mod dispatcher;
pub mod inbound;

pub use dispatcher::{decode_message, Dispatcher};
pub use envelope::{decode, Envelope};
pub use events::*;
pub use inbound::{create_webhook_router, WebhookState};
pub use resolver::resolve_message_kind;
pub use signature::{sign_payload, verify_signature, WebhookVerifier, SIGNATURE_HEADER};

use thiserror::Error;

/// Webhook errors
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unrecognized message variant: {0:?}")]
    UnrecognizedVariant(String),
}

pub type Result<T> = std::result::Result<T, WebhookError>;
