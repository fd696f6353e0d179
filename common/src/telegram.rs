use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::TelegramConfig;
use crate::error::SendError;
use crate::models::{ApiResponse, MessageRequest, SendMessagePayload, TgMessage};
use crate::utils::mask_token;

const SEND_MESSAGE: &str = "sendMessage";

/// A message Telegram accepted, with the full response body it came in.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: TgMessage,
    pub raw: Value,
}

#[derive(Debug, Clone, Default)]
pub struct TelegramClient {
    client: Client,
}

impl TelegramClient {
    pub fn new() -> Self {
        TelegramClient {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        TelegramClient { client }
    }

    /// Issues one `sendMessage` call. Both the HTTP status and the body's
    /// `ok` flag must indicate success.
    pub async fn send_message(
        &self,
        config: &TelegramConfig,
        request: &MessageRequest,
    ) -> Result<SentMessage, SendError> {
        let url = config.method_url(SEND_MESSAGE);
        let payload = SendMessagePayload::from(request);

        info!(
            chat_id = %request.chat_id,
            token = %mask_token(&config.token),
            base_url = %config.base_url,
            "Sending telegram message"
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        debug!("Telegram API response status: {}", status);

        if !status.is_success() {
            error!("Telegram API rejected the request with HTTP {}", status);
            return Err(SendError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body)?;
        let api: ApiResponse = serde_json::from_value(raw.clone())?;

        if !api.ok {
            let description = api
                .description
                .unwrap_or_else(|| "no description".to_string());
            warn!(
                error_code = ?api.error_code,
                "Telegram API error: {}", description
            );
            return Err(SendError::Provider(description));
        }

        let result = api.result.ok_or_else(|| {
            SendError::Unexpected("Telegram response has ok=true but no result".to_string())
        })?;
        let message: TgMessage = serde_json::from_value(result)?;

        info!(message_id = message.message_id, "Telegram message delivered");
        Ok(SentMessage { message, raw })
    }
}
