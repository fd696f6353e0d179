use serde_json::Value;
use tracing::{info, warn};

use crate::config::{EnvProvider, ProcessEnv, TelegramConfig};
use crate::error::SendError;
use crate::models::{Envelope, MessageRequest, SendMessageInput, SendOutcome};
use crate::telegram::TelegramClient;

/// Sends one message per call and reports every outcome as an [`Envelope`].
///
/// Configuration is looked up through `E` on each call, so concurrent sends
/// share nothing but the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct MessageSender<E = ProcessEnv> {
    env: E,
    client: TelegramClient,
}

impl MessageSender<ProcessEnv> {
    pub fn from_env() -> Self {
        MessageSender::new(ProcessEnv::new())
    }
}

impl<E: EnvProvider> MessageSender<E> {
    pub fn new(env: E) -> Self {
        MessageSender {
            env,
            client: TelegramClient::new(),
        }
    }

    pub fn with_client(env: E, client: TelegramClient) -> Self {
        MessageSender { env, client }
    }

    /// Never fails: validation, configuration, transport and provider errors
    /// all come back as a failure envelope.
    pub async fn send(&self, input: Value) -> Envelope {
        let result = match parse_input(input) {
            Ok(request) => self.send_request(&request).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(outcome) => info!(
                chat_id = %outcome.chat_id,
                message_id = outcome.message_id,
                "Message sent"
            ),
            Err(err) => warn!(kind = err.kind(), "Message not sent: {}", err),
        }

        Envelope::from(result)
    }

    pub async fn send_request(&self, request: &MessageRequest) -> Result<SendOutcome, SendError> {
        let config = TelegramConfig::resolve(&self.env)?;
        let sent = self.client.send_message(&config, request).await?;
        Ok(SendOutcome::new(request, sent.message, sent.raw))
    }
}

/// Upstream callers sometimes pass the argument list itself, so a
/// one-element array holding an object is replaced by that object.
pub fn normalize_input(input: Value) -> Value {
    match input {
        Value::Array(mut items) if items.len() == 1 && items[0].is_object() => items.remove(0),
        other => other,
    }
}

pub fn parse_input(input: Value) -> Result<MessageRequest, SendError> {
    let input: SendMessageInput = serde_json::from_value(normalize_input(input))
        .map_err(|e| SendError::Unexpected(format!("invalid request payload: {e}")))?;
    MessageRequest::try_from(input)
}
