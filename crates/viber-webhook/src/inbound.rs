//! Inbound webhook handling
//!
//! One POST route per bot. The raw body is authenticated before anything is
//! parsed; after that the callback is always acknowledged with 200 so the
//! platform does not retry payloads this side could never process.

use crate::{dispatcher::Dispatcher, envelope, signature::WebhookVerifier, SIGNATURE_HEADER};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shared state for the webhook route
#[derive(Debug)]
pub struct WebhookState {
    verifier: WebhookVerifier,
    signature_header: String,
    dispatcher: Dispatcher,
}

impl WebhookState {
    pub fn new(secret: impl AsRef<[u8]>, dispatcher: Dispatcher) -> Self {
        Self {
            verifier: WebhookVerifier::new(secret),
            signature_header: SIGNATURE_HEADER.to_string(),
            dispatcher,
        }
    }

    pub fn with_signature_header(mut self, header: &str) -> Self {
        self.signature_header = header.to_string();
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Create Axum router serving callbacks on `path`
pub fn create_webhook_router(path: &str, state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(path, post(handle_callback))
        .with_state(state)
}

/// Handle one callback request
async fn handle_callback(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let signature = match headers
        .get(state.signature_header.as_str())
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            warn!(header = %state.signature_header, "Callback without signature");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    if let Err(e) = state.verifier.verify(&body, signature) {
        warn!(error = %e, "Callback signature verification failed");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let envelope = match envelope::decode(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Failed to decode callback");
            return StatusCode::OK.into_response();
        }
    };

    let event = envelope.kind.clone();
    debug!(event = %event, "Received callback");

    match state.dispatcher.dispatch(envelope).await {
        Ok(Some(reply)) => json_reply(&event, &reply),
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => {
            warn!(event = %event, error = %e, "Failed to process callback");
            StatusCode::OK.into_response()
        }
    }
}

fn json_reply(event: &str, reply: &viber_core::Message) -> Response {
    match serde_json::to_vec(reply) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(event = %event, error = %e, "Failed to encode reply");
            StatusCode::OK.into_response()
        }
    }
}
