use serde::{Deserialize, Serialize};

/// How Telegram interprets entities in the message text.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMode {
    HTML,
    Markdown,
    MarkdownV2,
}

impl_str_enum!(ParseMode, "parse_mode", HTML, Markdown, MarkdownV2);

/// Keeps only the edges of a bot token so it can appear in logs.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}
