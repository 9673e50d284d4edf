//! Echo bot handlers

use tracing::{debug, info, warn};
use viber_core::{Message, Sender};
use viber_sdk::ViberClient;
use viber_webhook::HandlerSet;

/// Handlers that echo every supported message back to its sender and greet
/// users opening a conversation with `welcome_text`.
pub fn echo_handlers(client: ViberClient, sender: Sender, welcome_text: Option<String>) -> HandlerSet {
    HandlerSet::new()
        .on_message(move |event| {
            let client = client.clone();
            async move {
                let Some(receiver) = event.sender.id.clone() else {
                    warn!(sender = %event.sender.name, "Message without sender id, not echoing");
                    return;
                };

                let kind = event.message.kind();
                match client.send_message(&receiver, event.message).await {
                    Ok(token) => debug!(kind = %kind, message_token = token, "Echoed message"),
                    Err(e) => warn!(kind = %kind, error = %e, "Failed to echo message"),
                }
            }
        })
        .on_conversation_started(move |event| {
            let reply = welcome_text
                .clone()
                .map(|text| Message::text(text).with_sender(sender.clone()));
            async move {
                info!(
                    user = %event.user.name,
                    context = ?event.context,
                    subscribed = event.subscribed,
                    "Conversation started"
                );
                reply
            }
        })
        .on_subscribed(|event| async move {
            info!(user_id = %event.user_id, "User subscribed");
        })
        .on_unsubscribed(|event| async move {
            info!(user_id = %event.user_id, "User unsubscribed");
        })
        .on_delivered(|event| async move {
            debug!(user_id = %event.user_id, message_token = ?event.message_token, "Message delivered");
        })
        .on_seen(|event| async move {
            debug!(user_id = %event.user_id, message_token = ?event.message_token, "Message seen");
        })
        .on_failed(|event| async move {
            warn!(
                user_id = %event.user_id,
                message_token = ?event.message_token,
                description = %event.description,
                "Message delivery failed"
            );
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use viber_core::User;
    use viber_webhook::{decode, Dispatcher, EventKind};

    fn client() -> ViberClient {
        ViberClient::builder()
            .base_url("http://127.0.0.1:9/pa/")
            .auth_token("test-token")
            .build()
            .unwrap()
    }

    #[test]
    fn test_all_slots_registered() {
        let handlers = echo_handlers(client(), User::new("Echo"), None);
        assert_eq!(handlers.registered().len(), 7);
        assert!(handlers.registered().contains(&EventKind::Message));
    }

    #[tokio::test]
    async fn test_welcome_reply() {
        let handlers = echo_handlers(
            client(),
            User::new("Echo").with_avatar("http://example.com/a.png"),
            Some("Hi there".to_string()),
        );
        let dispatcher = Dispatcher::new(handlers);
        let envelope = decode(
            br#"{"event":"conversation_started","timestamp":1457764197627,"user":{"id":"U","name":"Ann"}}"#,
        )
        .unwrap();

        let reply = dispatcher.dispatch(envelope).await.unwrap().unwrap();
        assert_eq!(reply.body_text(), Some("Hi there"));
        assert_eq!(reply.outbound.sender.as_ref().map(|s| s.name.as_str()), Some("Echo"));
        assert!(reply.outbound.receiver.is_none());
    }

    #[tokio::test]
    async fn test_no_welcome_without_text() {
        let dispatcher = Dispatcher::new(echo_handlers(client(), User::new("Echo"), None));
        let envelope = decode(
            br#"{"event":"conversation_started","timestamp":1457764197627,"user":{"name":"Ann"}}"#,
        )
        .unwrap();
        assert!(dispatcher.dispatch(envelope).await.unwrap().is_none());
    }
}
