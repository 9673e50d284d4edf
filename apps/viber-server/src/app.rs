//! Application state and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use viber_core::BotConfig;
use viber_sdk::ViberClient;
use viber_webhook::{Dispatcher, WebhookState};

use crate::bot::echo_handlers;
use crate::cli::Args;
use crate::server::Server;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BotConfig>,
    pub client: ViberClient,
    pub webhook: Arc<WebhookState>,
}

impl AppState {
    pub fn new(config: BotConfig) -> Result<Self> {
        info!("Initializing application components");

        let client = ViberClient::from_config(&config).context("Failed to create API client")?;

        let handlers = echo_handlers(
            client.clone(),
            config.sender.to_sender(),
            config.welcome_text.clone(),
        );
        info!(registered = ?handlers.registered(), "Handlers wired");

        let webhook = Arc::new(
            WebhookState::new(config.auth.token.as_bytes(), Dispatcher::new(handlers))
                .with_signature_header(&config.webhook.signature_header),
        );

        Ok(Self {
            config: Arc::new(config),
            client,
            webhook,
        })
    }
}

/// Main application
pub struct App {
    args: Args,
    state: AppState,
}

impl App {
    /// Load configuration and build all components
    pub async fn build(args: Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => BotConfig::load_from_file(path, "VIBER")
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => BotConfig::load().context("Failed to load configuration")?,
        };

        if let Some(port) = args.port {
            config.server.port = port;
        }
        config.validate().context("Invalid configuration")?;

        let state = AppState::new(config)?;

        Ok(Self { args, state })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        info!("Starting server");
        info!("HTTP address: {}", self.state.config.server.address());

        let server = Server::new(self.state, !self.args.skip_registration);
        server.run().await?;

        Ok(())
    }
}
