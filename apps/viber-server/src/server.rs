//! HTTP Server implementation

use anyhow::{Context, Result};
use axum::{http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use viber_webhook::create_webhook_router;

use crate::app::AppState;

pub struct Server {
    state: AppState,
    register_webhook: bool,
}

impl Server {
    pub fn new(state: AppState, register_webhook: bool) -> Self {
        Self {
            state,
            register_webhook,
        }
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.server.address();
        let app = build_router(&self.state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server on {}", addr))?;
        info!(
            "HTTP server listening on {} (webhook at {})",
            addr, self.state.config.webhook.path
        );

        // The platform calls the URL back during registration, so the
        // listener has to be bound first.
        if self.register_webhook {
            self.spawn_registration();
        }

        axum::serve(listener, app.into_make_service())
            .await
            .context("HTTP server error")?;

        Ok(())
    }

    fn spawn_registration(&self) {
        let Some(url) = self.state.config.webhook.url.clone() else {
            info!("webhook.url not set, skipping registration");
            return;
        };
        let client = self.state.client.clone();
        let event_types = self.state.config.webhook.event_types.clone();

        tokio::spawn(async move {
            match client.set_webhook(&url, &event_types).await {
                Ok(response) => info!(
                    url = %url,
                    event_types = ?response.event_types,
                    "Webhook registered"
                ),
                Err(e) => warn!(url = %url, error = %e, "Webhook registration failed"),
            }
        });
    }
}

pub fn build_router(state: &AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(create_webhook_router(
            &state.config.webhook.path,
            state.webhook.clone(),
        ))
        .layer(TraceLayer::new_for_http())
}

// Route handlers

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "Viber Bot",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}
