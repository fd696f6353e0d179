use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::Parser;
use common::{error::SendError, utils::ParseMode, Envelope, MessageSender};
use serde_json::{json, Map, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Sends one Telegram message and prints the result envelope as JSON.
///
/// The request comes from the field flags, `--input`, `--file`, or stdin,
/// in that order.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, allow_hyphen_values = true)]
    chat_id: Option<String>,

    #[clap(long)]
    text: Option<String>,

    #[clap(long)]
    parse_mode: Option<ParseMode>,

    #[clap(long)]
    reply_to: Option<i64>,

    #[clap(long)]
    disable_web_page_preview: Option<bool>,

    #[clap(long)]
    disable_notification: Option<bool>,

    /// Request as a JSON document
    #[clap(long, conflicts_with = "file")]
    input: Option<String>,

    /// Path to a JSON request
    #[clap(long)]
    file: Option<PathBuf>,

    #[clap(long)]
    pretty: bool,
}

impl Cli {
    fn flags_payload(&self) -> Option<Value> {
        if self.chat_id.is_none() && self.text.is_none() {
            return None;
        }

        let mut payload = Map::new();
        if let Some(chat_id) = &self.chat_id {
            payload.insert("chatId".into(), json!(chat_id));
        }
        if let Some(text) = &self.text {
            payload.insert("mensagem".into(), json!(text));
        }
        if let Some(parse_mode) = self.parse_mode {
            payload.insert("parseMode".into(), json!(parse_mode));
        }
        if let Some(reply_to) = self.reply_to {
            payload.insert("replyToMessageId".into(), json!(reply_to));
        }
        if let Some(disable) = self.disable_web_page_preview {
            payload.insert("disableWebPagePreview".into(), json!(disable));
        }
        if let Some(disable) = self.disable_notification {
            payload.insert("disableNotification".into(), json!(disable));
        }

        Some(Value::Object(payload))
    }

    fn read_input(&self) -> Result<Value, SendError> {
        if let Some(payload) = self.flags_payload() {
            return Ok(payload);
        }

        let raw = match (&self.input, &self.file) {
            (Some(json), _) => json.clone(),
            (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
                SendError::Unexpected(format!("failed to read {}: {e}", path.display()))
            })?,
            (None, None) => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| SendError::Unexpected(format!("failed to read stdin: {e}")))?;
                buf
            }
        };

        serde_json::from_str(&raw)
            .map_err(|e| SendError::Unexpected(format!("invalid request payload: {e}")))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli);

    let envelope = match cli.read_input() {
        Ok(input) => MessageSender::from_env().send(input).await,
        Err(err) => Envelope::from(Err(err)),
    };

    let output = if cli.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    println!("{}", output);

    Ok(())
}
