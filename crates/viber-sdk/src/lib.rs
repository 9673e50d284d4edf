//! # Viber SDK
//!
//! Outbound client for the Viber bot REST API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use viber_core::User;
//! use viber_sdk::ViberClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ViberClient::builder()
//!         .auth_token("your-app-key")
//!         .sender(User::new("Echo Bot"))
//!         .build()?;
//!
//!     let token = client.send_text_message("01234567890A=", "Hello").await?;
//!     println!("sent {}", token);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{
    parse_message_response, ViberClient, ViberClientBuilder, AUTH_TOKEN_HEADER, DEFAULT_BASE_URL,
};
pub use error::{Result, ViberError};
pub use models::*;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
