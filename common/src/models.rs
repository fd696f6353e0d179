use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SendError, CHAT_ID_REQUIRED, TEXT_REQUIRED};
use crate::utils::ParseMode;

/// Inbound request as the calling platform sends it. Everything is optional
/// here; [`MessageRequest`] is the validated form.
///
/// Falsy values (`null`, `false`, `0`, `""`) in `chatId`, `mensagem` and
/// `text` read as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    #[serde(default, deserialize_with = "truthy_string")]
    pub chat_id: Option<String>,
    #[serde(default, deserialize_with = "truthy_string")]
    pub mensagem: Option<String>,
    /// Accepted when `mensagem` is absent.
    #[serde(default, deserialize_with = "truthy_string")]
    pub text: Option<String>,
    pub parse_mode: Option<String>,
    pub reply_to_message_id: Option<i64>,
    pub disable_web_page_preview: Option<bool>,
    pub disable_notification: Option<bool>,
}

fn truthy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRequest {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub reply_to_message_id: Option<i64>,
    /// `None` leaves the key off the wire; `Some(false)` sends `false`.
    pub disable_web_page_preview: Option<bool>,
    pub disable_notification: Option<bool>,
}

impl MessageRequest {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        MessageRequest {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: None,
            reply_to_message_id: None,
            disable_web_page_preview: None,
            disable_notification: None,
        }
    }
}

impl TryFrom<SendMessageInput> for MessageRequest {
    type Error = SendError;

    fn try_from(input: SendMessageInput) -> Result<Self, Self::Error> {
        let chat_id = input
            .chat_id
            .ok_or_else(|| SendError::Validation(CHAT_ID_REQUIRED.to_string()))?;
        let text = input
            .mensagem
            .or(input.text)
            .ok_or_else(|| SendError::Validation(TEXT_REQUIRED.to_string()))?;

        let parse_mode = match input.parse_mode.as_deref() {
            None | Some("") => None,
            Some(mode) => Some(mode.parse::<ParseMode>().map_err(SendError::Validation)?),
        };

        Ok(MessageRequest {
            chat_id,
            text,
            parse_mode,
            // Zero is never a real message id and reads as unset.
            reply_to_message_id: input.reply_to_message_id.filter(|id| *id != 0),
            disable_web_page_preview: input.disable_web_page_preview,
            disable_notification: input.disable_notification,
        })
    }
}

/// JSON body of `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessagePayload<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_web_page_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl<'a> From<&'a MessageRequest> for SendMessagePayload<'a> {
    fn from(request: &'a MessageRequest) -> Self {
        SendMessagePayload {
            chat_id: &request.chat_id,
            text: &request.text,
            parse_mode: request.parse_mode,
            reply_to_message_id: request.reply_to_message_id,
            disable_web_page_preview: request.disable_web_page_preview,
            disable_notification: request.disable_notification,
        }
    }
}

/// Top-level Bot API envelope. `result` stays untyped until `ok` is checked.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub ok: bool,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub message_id: i64,
    pub date: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderIdentity {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatIdentity {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Flattened view of a delivered message, plus the provider body verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub chat_id: String,
    pub mensagem: String,
    pub message_id: i64,
    pub date: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<SenderIdentity>,
    pub chat: ChatIdentity,
    pub telegram_response: Value,
}

impl SendOutcome {
    pub fn new(request: &MessageRequest, message: TgMessage, telegram_response: Value) -> Self {
        SendOutcome {
            chat_id: request.chat_id.clone(),
            mensagem: request.text.clone(),
            message_id: message.message_id,
            date: message.date,
            from: message.from.map(|user| SenderIdentity {
                id: user.id,
                is_bot: user.is_bot,
                first_name: user.first_name,
                username: user.username,
            }),
            chat: ChatIdentity {
                id: message.chat.id,
                kind: message.chat.kind,
                title: message.chat.title,
                username: message.chat.username,
            },
            telegram_response,
        }
    }
}

/// The only value handed back to the caller: either data or an error
/// message, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    success: bool,
    data: Option<SendOutcome>,
    error_message: Option<String>,
}

impl Envelope {
    pub fn success(data: SendOutcome) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Envelope {
            success: false,
            data: None,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&SendOutcome> {
        self.data.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl From<Result<SendOutcome, SendError>> for Envelope {
    fn from(result: Result<SendOutcome, SendError>) -> Self {
        match result {
            Ok(data) => Envelope::success(data),
            Err(err) => Envelope::failure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> SendMessageInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_chat_id() {
        let err = MessageRequest::try_from(input(json!({"mensagem": "hi"}))).unwrap_err();
        assert!(matches!(err, SendError::Validation(_)));
        assert_eq!(err.to_string(), CHAT_ID_REQUIRED);
    }

    #[test]
    fn test_empty_text() {
        let err =
            MessageRequest::try_from(input(json!({"chatId": "1", "mensagem": ""}))).unwrap_err();
        assert_eq!(err.to_string(), TEXT_REQUIRED);
    }

    #[test]
    fn test_chat_id_is_checked_before_text() {
        let err = MessageRequest::try_from(input(json!({}))).unwrap_err();
        assert_eq!(err.to_string(), CHAT_ID_REQUIRED);
    }

    #[test]
    fn test_numeric_chat_id_and_text_alias() {
        let request =
            MessageRequest::try_from(input(json!({"chatId": -1001234, "text": "hello"}))).unwrap();
        assert_eq!(request.chat_id, "-1001234");
        assert_eq!(request.text, "hello");
    }

    #[test]
    fn test_falsy_chat_id_is_missing() {
        for chat_id in [json!(0), json!(false), json!(""), json!(null)] {
            let err = MessageRequest::try_from(input(json!({"chatId": chat_id, "mensagem": "x"})))
                .unwrap_err();
            assert_eq!(err.to_string(), CHAT_ID_REQUIRED);
        }
    }

    #[test]
    fn test_falsy_text_is_missing() {
        for text in [json!(0), json!(false), json!("")] {
            let err = MessageRequest::try_from(input(json!({"chatId": "1", "mensagem": text})))
                .unwrap_err();
            assert_eq!(err.to_string(), TEXT_REQUIRED);
        }
    }

    #[test]
    fn test_mensagem_preferred_over_text() {
        let request = MessageRequest::try_from(input(
            json!({"chatId": "1", "mensagem": "primary", "text": "secondary"}),
        ))
        .unwrap();
        assert_eq!(request.text, "primary");

        let request = MessageRequest::try_from(input(
            json!({"chatId": "1", "mensagem": "", "text": "secondary"}),
        ))
        .unwrap();
        assert_eq!(request.text, "secondary");
    }

    #[test]
    fn test_zero_reply_to_is_unset() {
        let request = MessageRequest::try_from(input(
            json!({"chatId": "1", "mensagem": "x", "replyToMessageId": 0}),
        ))
        .unwrap();
        assert_eq!(request.reply_to_message_id, None);
    }

    #[test]
    fn test_parse_mode_handling() {
        let request = MessageRequest::try_from(input(
            json!({"chatId": "1", "mensagem": "x", "parseMode": "MarkdownV2"}),
        ))
        .unwrap();
        assert_eq!(request.parse_mode, Some(ParseMode::MarkdownV2));

        let request = MessageRequest::try_from(input(
            json!({"chatId": "1", "mensagem": "x", "parseMode": ""}),
        ))
        .unwrap();
        assert_eq!(request.parse_mode, None);

        let err = MessageRequest::try_from(input(
            json!({"chatId": "1", "mensagem": "x", "parseMode": "BBCode"}),
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid parse_mode: BBCode");
    }

    #[test]
    fn test_payload_omits_unset_optionals() {
        let request = MessageRequest::new("42", "hello");
        let body = serde_json::to_value(SendMessagePayload::from(&request)).unwrap();
        assert_eq!(body, json!({"chat_id": "42", "text": "hello"}));
    }

    #[test]
    fn test_payload_keeps_explicit_false() {
        let mut request = MessageRequest::new("42", "hello");
        request.parse_mode = Some(ParseMode::HTML);
        request.reply_to_message_id = Some(7);
        request.disable_notification = Some(false);

        let body = serde_json::to_value(SendMessagePayload::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "chat_id": "42",
                "text": "hello",
                "parse_mode": "HTML",
                "reply_to_message_id": 7,
                "disable_notification": false
            })
        );
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = Envelope::from(Err(SendError::Provider("chat not found".into())));
        assert!(!envelope.is_success());
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "data": null,
                "errorMessage": "Telegram error: chat not found"
            })
        );
    }

    #[test]
    fn test_outcome_flattens_message() {
        let raw = json!({
            "ok": true,
            "result": {
                "message_id": 5,
                "date": 1700000000,
                "from": {"id": 1, "is_bot": true, "first_name": "Bot", "username": "mybot"},
                "chat": {"id": -100, "type": "channel", "title": "News"}
            }
        });
        let message: TgMessage = serde_json::from_value(raw["result"].clone()).unwrap();
        let request = MessageRequest::new("-100", "hi");
        let outcome = SendOutcome::new(&request, message, raw.clone());

        assert_eq!(
            serde_json::to_value(Envelope::success(outcome)).unwrap(),
            json!({
                "success": true,
                "data": {
                    "chatId": "-100",
                    "mensagem": "hi",
                    "messageId": 5,
                    "date": 1700000000,
                    "from": {"id": 1, "isBot": true, "firstName": "Bot", "username": "mybot"},
                    "chat": {"id": -100, "type": "channel", "title": "News"},
                    "telegramResponse": raw
                },
                "errorMessage": null
            })
        );
    }
}
