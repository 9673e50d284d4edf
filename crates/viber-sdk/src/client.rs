//! Viber API client implementation

use crate::error::{Result, ViberError};
use crate::models::*;
use reqwest::{header, Client};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;
use viber_core::{BotConfig, Message, MessageToken, RichMediaMessage, Sender, VideoMessage};

/// Header carrying the bot's auth token on every request
pub const AUTH_TOKEN_HEADER: &str = "X-Viber-Auth-Token";

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://chatapi.viber.com/pa/";

/// Client for the Viber bot REST API
#[derive(Clone)]
pub struct ViberClient {
    http: Client,
    base_url: Url,
    auth_token: Secret<String>,
    sender: Option<Sender>,
}

impl std::fmt::Debug for ViberClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViberClient")
            .field("base_url", &self.base_url)
            .field("auth_token", &"[REDACTED]")
            .field("sender", &self.sender)
            .finish()
    }
}

/// Builder for creating a ViberClient
#[derive(Default)]
pub struct ViberClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    sender: Option<Sender>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ViberClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root; endpoints are joined onto it
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Sender used for messages that do not carry their own
    pub fn sender(mut self, sender: Sender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ViberClient> {
        let auth_token = self
            .auth_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ViberError::Config("auth token is required".to_string()))?;

        let mut base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;

        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("viber-sdk/{}", env!("CARGO_PKG_VERSION")));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()
            .map_err(ViberError::Http)?;

        Ok(ViberClient {
            http,
            base_url,
            auth_token: Secret::new(auth_token),
            sender: self.sender,
        })
    }
}

impl ViberClient {
    pub fn builder() -> ViberClientBuilder {
        ViberClientBuilder::new()
    }

    /// Create a client against the public API
    pub fn new(auth_token: impl Into<String>) -> Result<Self> {
        Self::builder().auth_token(auth_token).build()
    }

    /// Create a client from bot configuration
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.api.base_url.clone())
            .auth_token(config.auth.token.clone())
            .sender(config.sender.to_sender())
            .timeout(config.api.timeout())
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn sender(&self) -> Option<&Sender> {
        self.sender.as_ref()
    }

    fn url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(ViberError::Url)
    }

    /// POST a JSON payload to `endpoint` and return the raw response body.
    ///
    /// Transport failures and non-success HTTP statuses are errors; the body
    /// itself is not interpreted.
    #[instrument(skip(self, payload))]
    pub async fn post_data<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(payload)?;
        debug!(bytes = body.len(), "Posting to API");

        let response = self
            .http
            .post(self.url(endpoint)?)
            .header(AUTH_TOKEN_HEADER, self.auth_token.expose_secret().as_str())
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?.to_vec())
    }

    // ===== Messages =====

    /// Send a message to one user and return its token.
    ///
    /// The client's default sender is filled in when the message has none.
    #[instrument(skip(self, message), fields(kind = %message.kind()))]
    pub async fn send_message(&self, receiver: &str, message: Message) -> Result<MessageToken> {
        let message = self.with_default_sender(message.with_receiver(receiver));
        let body = self.post_data("send_message", &message).await?;
        parse_message_response(&body)
    }

    /// Publish a message on the public account as member `from`
    #[instrument(skip(self, message), fields(kind = %message.kind()))]
    pub async fn send_public_message(&self, from: &str, message: Message) -> Result<MessageToken> {
        let mut message = self.with_default_sender(message.with_from(from));
        message.outbound.receiver = None;
        let body = self.post_data("post", &message).await?;
        parse_message_response(&body)
    }

    pub async fn send_text_message(
        &self,
        receiver: &str,
        text: impl Into<String>,
    ) -> Result<MessageToken> {
        self.send_message(receiver, Message::text(text)).await
    }

    pub async fn send_url_message(
        &self,
        receiver: &str,
        text: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<MessageToken> {
        self.send_message(receiver, Message::url(text, url)).await
    }

    pub async fn send_picture_message(
        &self,
        receiver: &str,
        text: impl Into<String>,
        media_url: impl Into<String>,
        thumbnail_url: Option<String>,
    ) -> Result<MessageToken> {
        self.send_message(receiver, Message::picture(text, media_url, thumbnail_url))
            .await
    }

    pub async fn send_video_message(
        &self,
        receiver: &str,
        media_url: impl Into<String>,
        size_bytes: u64,
        thumbnail_url: Option<String>,
    ) -> Result<MessageToken> {
        let video = VideoMessage {
            media_url: media_url.into(),
            size_bytes,
            thumbnail_url,
            ..Default::default()
        };
        self.send_message(receiver, Message::new(video)).await
    }

    /// Send a carousel of buttons
    #[instrument(skip(self, message))]
    pub async fn send_rich_media(
        &self,
        receiver: &str,
        mut message: RichMediaMessage,
    ) -> Result<MessageToken> {
        message.receiver = Some(receiver.to_string());
        let body = self.post_data("send_message", &message).await?;
        parse_message_response(&body)
    }

    // ===== Webhook registration =====

    /// Register `url` as the callback endpoint for `event_types`
    #[instrument(skip(self))]
    pub async fn set_webhook(&self, url: &str, event_types: &[String]) -> Result<WebhookResponse> {
        let request = WebhookRequest {
            url: url.to_string(),
            event_types: event_types.to_vec(),
        };
        let body = self.post_data("set_webhook", &request).await?;
        let response: WebhookResponse = serde_json::from_slice(&body)?;

        if response.status != 0 {
            warn!(status = response.status, message = %response.status_message, "Webhook registration rejected");
            return Err(ViberError::Delivery {
                status: response.status,
                message: response.status_message,
            });
        }
        Ok(response)
    }

    /// Stop receiving callbacks
    pub async fn remove_webhook(&self) -> Result<WebhookResponse> {
        self.set_webhook("", &[]).await
    }

    fn with_default_sender(&self, mut message: Message) -> Message {
        if message.outbound.sender.is_none() {
            message.outbound.sender = self.sender.clone();
        }
        message
    }
}

/// Decode a send response into its message token.
///
/// A non-zero status becomes [`ViberError::Delivery`]. A successful response
/// without a token yields token 0.
pub fn parse_message_response(body: &[u8]) -> Result<MessageToken> {
    let response: MessageResponse = serde_json::from_slice(body)?;
    if response.status != 0 {
        return Err(ViberError::Delivery {
            status: response.status,
            message: response.status_message,
        });
    }
    Ok(response.message_token.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use viber_core::{rich_media::ActionType, Button, User};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "445da6az1s345z78-dazcczb2542zv51a-e0vc5fva17480im9";

    fn client(server: &MockServer) -> ViberClient {
        ViberClient::builder()
            .base_url(format!("{}/pa", server.uri()))
            .auth_token(TOKEN)
            .sender(User::new("Echo Bot").with_avatar("http://example.com/bot.jpg"))
            .build()
            .unwrap()
    }

    fn ok(token: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "status": 0, "status_message": "ok", "message_token": token
        }))
    }

    #[test]
    fn test_builder_requires_token() {
        let err = ViberClient::builder().build().unwrap_err();
        assert!(matches!(err, ViberError::Config(_)));
    }

    #[test]
    fn test_builder_normalizes_base_url() {
        let client = ViberClient::builder()
            .base_url("http://localhost:9000/pa")
            .auth_token(TOKEN)
            .build()
            .unwrap();
        assert_eq!(client.url("send_message").unwrap().as_str(), "http://localhost:9000/pa/send_message");
        assert_eq!(ViberClient::new(TOKEN).unwrap().base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = ViberClient::new(TOKEN).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains(TOKEN));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_parse_message_response() {
        assert_eq!(
            parse_message_response(br#"{"status":0,"status_message":"ok","message_token":5098034272017990000}"#).unwrap(),
            5_098_034_272_017_990_000
        );
        assert_eq!(parse_message_response(br#"{"status":0}"#).unwrap(), 0);

        match parse_message_response(br#"{"status":5,"status_message":"receiverNotRegistered"}"#) {
            Err(ViberError::Delivery { status, message }) => {
                assert_eq!(status, 5);
                assert_eq!(message, "receiverNotRegistered");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse_message_response(b"<html>"), Err(ViberError::Json(_))));
    }

    #[tokio::test]
    async fn test_send_text_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/send_message"))
            .and(header(AUTH_TOKEN_HEADER, TOKEN))
            .and(body_partial_json(json!({
                "receiver": "01234567890A=",
                "type": "text",
                "text": "Hello",
                "sender": {"name": "Echo Bot", "avatar": "http://example.com/bot.jpg"}
            })))
            .respond_with(ok(42))
            .expect(1)
            .mount(&server)
            .await;

        let token = client(&server)
            .send_text_message("01234567890A=", "Hello")
            .await
            .unwrap();
        assert_eq!(token, 42);
    }

    #[tokio::test]
    async fn test_explicit_sender_wins() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/send_message"))
            .and(body_partial_json(json!({"sender": {"name": "Other"}})))
            .respond_with(ok(1))
            .expect(1)
            .mount(&server)
            .await;

        let message = Message::text("hi").with_sender(User::new("Other"));
        client(&server).send_message("U", message).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_video_message_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/send_message"))
            .and(body_partial_json(json!({
                "type": "video",
                "media": "http://example.com/v.mp4",
                "size": 10000,
                "thumbnail": "http://example.com/t.jpg"
            })))
            .respond_with(ok(7))
            .expect(1)
            .mount(&server)
            .await;

        let token = client(&server)
            .send_video_message("U", "http://example.com/v.mp4", 10_000, Some("http://example.com/t.jpg".to_string()))
            .await
            .unwrap();
        assert_eq!(token, 7);
    }

    #[tokio::test]
    async fn test_send_public_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/post"))
            .and(body_partial_json(json!({"from": "member-id", "type": "url", "media": "http://example.com"})))
            .respond_with(ok(9))
            .expect(1)
            .mount(&server)
            .await;

        let token = client(&server)
            .send_public_message("member-id", Message::url("", "http://example.com"))
            .await
            .unwrap();
        assert_eq!(token, 9);
    }

    #[tokio::test]
    async fn test_send_rich_media() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/send_message"))
            .and(body_partial_json(json!({
                "receiver": "U",
                "type": "rich_media",
                "min_api_version": 2,
                "rich_media": {"Type": "rich_media", "ButtonsGroupColumns": 6, "ButtonsGroupRows": 7}
            })))
            .respond_with(ok(3))
            .expect(1)
            .mount(&server)
            .await;

        let mut carousel = RichMediaMessage::new(6, 7, "#FFFFFF");
        carousel.add_button(Button::new(6, 1, ActionType::Reply, "buy").with_text("Buy"));
        let token = client(&server).send_rich_media("U", carousel).await.unwrap();
        assert_eq!(token, 3);
    }

    #[tokio::test]
    async fn test_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/send_message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 6, "status_message": "notSubscribed"
            })))
            .mount(&server)
            .await;

        let err = client(&server).send_text_message("U", "hi").await.unwrap_err();
        assert_eq!(err.status_code(), Some(6));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).send_text_message("U", "hi").await.unwrap_err();
        assert!(matches!(err, ViberError::Http(_)));
    }

    #[tokio::test]
    async fn test_set_and_remove_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/set_webhook"))
            .and(body_partial_json(json!({
                "url": "https://bot.example.com/viber/webhook",
                "event_types": ["delivered", "seen"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 0, "status_message": "ok", "event_types": ["delivered", "seen"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/pa/set_webhook"))
            .and(body_partial_json(json!({"url": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0, "status_message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let response = client
            .set_webhook(
                "https://bot.example.com/viber/webhook",
                &["delivered".to_string(), "seen".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(response.event_types, vec!["delivered", "seen"]);

        let response = client.remove_webhook().await.unwrap();
        assert!(response.event_types.is_empty());
    }

    #[tokio::test]
    async fn test_set_webhook_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/pa/set_webhook"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1, "status_message": "invalidUrl"
            })))
            .mount(&server)
            .await;

        let err = client(&server).set_webhook("not-a-url", &[]).await.unwrap_err();
        assert!(matches!(err, ViberError::Delivery { status: 1, .. }));
    }
}
