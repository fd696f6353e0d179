use std::error::Error as StdError;

use thiserror::Error;

pub const CHAT_ID_REQUIRED: &str = "chat_id is required";
pub const TEXT_REQUIRED: &str = "message text is required";
pub const TOKEN_NOT_CONFIGURED: &str =
    "Telegram token not configured; set the TELEGRAM_BOT_TOKEN variable";

/// Every way a send can fail. The `Display` text is what the caller sees
/// as `errorMessage`.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    /// Network-level failure. The request URL (which embeds the token) is
    /// stripped before the message is built.
    #[error("{0}")]
    Transport(String),

    #[error("HTTP failure {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Telegram error: {0}")]
    Provider(String),

    #[error("{0}")]
    Unexpected(String),
}

impl SendError {
    pub fn kind(&self) -> &'static str {
        match self {
            SendError::Validation(_) => "validation",
            SendError::Configuration(_) => "configuration",
            SendError::Transport(_) | SendError::HttpStatus { .. } => "transport",
            SendError::Provider(_) => "provider",
            SendError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<reqwest::Error> for SendError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = StdError::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = StdError::source(cause);
        }
        SendError::Transport(message)
    }
}

impl From<serde_json::Error> for SendError {
    fn from(err: serde_json::Error) -> Self {
        SendError::Unexpected(err.to_string())
    }
}
