//! Core types and configuration shared by the Viber bot crates.
//!
//! - [`User`]: the sender / subscriber shape used by webhook callbacks
//! - [`Message`]: outbound and inbound messages as a tagged union of variants
//! - [`rich_media`]: carousel and keyboard payloads
//! - [`BotConfig`]: layered configuration (defaults, file, environment)

pub mod config;
pub mod error;
pub mod message;
pub mod rich_media;
pub mod types;

pub use config::*;
pub use error::*;
pub use message::*;
pub use rich_media::{Button, Keyboard, RichMedia, RichMediaMessage};
pub use types::*;
