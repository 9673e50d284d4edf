use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::types::Sender;

/// Callback events requested when registering the webhook.
pub const DEFAULT_EVENT_TYPES: [&str; 6] = [
    "delivered",
    "seen",
    "failed",
    "subscribed",
    "unsubscribed",
    "conversation_started",
];

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub auth: AuthConfig,
    pub sender: SenderConfig,
    pub webhook: WebhookConfig,
    pub server: ServerConfig,
    pub api: ApiConfig,
    /// Reply to conversation_started events. No reply when unset.
    #[serde(default)]
    pub welcome_text: Option<String>,
}

impl BotConfig {
    /// Load configuration from `VIBER__*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_env("VIBER")
    }

    /// Load configuration from environment with custom prefix
    pub fn load_from_env(prefix: &str) -> Result<Self> {
        let config = with_defaults(Config::builder())?
            .add_source(environment(prefix))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from file with environment overrides
    pub fn load_from_file(path: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        let config = with_defaults(Config::builder())?
            .add_source(File::from(path.as_ref()))
            .add_source(environment(prefix))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Reject configurations the bot cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.auth.token.trim().is_empty() {
            return Err(CoreError::InvalidConfig("auth.token must be set".to_string()));
        }
        if !self.webhook.path.starts_with('/') {
            return Err(CoreError::InvalidConfig(format!(
                "webhook.path must start with '/': {}",
                self.webhook.path
            )));
        }
        if self.sender.name.trim().is_empty() {
            return Err(CoreError::InvalidConfig("sender.name must be set".to_string()));
        }
        Ok(())
    }
}

fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
    Ok(builder
        .set_default("auth.token", "")?
        .set_default("sender.name", "Bot")?
        .set_default("webhook.path", "/viber/webhook")?
        .set_default("webhook.signature_header", "X-Viber-Content-Signature")?
        .set_default("webhook.event_types", DEFAULT_EVENT_TYPES.to_vec())?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("api.base_url", "https://chatapi.viber.com/pa/")?
        .set_default("api.timeout_seconds", 30)?)
}

fn environment(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("webhook.event_types")
}

/// Credentials for the bot API
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// App key; also the HMAC secret for callback signatures
    pub token: String,
}

/// Identity shown on outbound messages
#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl SenderConfig {
    pub fn to_sender(&self) -> Sender {
        let sender = Sender::new(self.name.clone());
        match &self.avatar {
            Some(avatar) => sender.with_avatar(avatar.clone()),
            None => sender,
        }
    }
}

/// Inbound callback settings
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Route the callback endpoint is mounted on
    pub path: String,
    /// Public URL to register with the platform on startup
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
    #[serde(default = "default_event_types")]
    pub event_types: Vec<String>,
}

fn default_signature_header() -> String {
    "X-Viber-Content-Signature".to_string()
}

fn default_event_types() -> Vec<String> {
    DEFAULT_EVENT_TYPES.iter().map(|s| s.to_string()).collect()
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Outbound API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_timeout_seconds() -> u64 {
    30
}
