use std::{collections::HashMap, env, fmt};

use dotenv::dotenv;

use crate::error::{SendError, TOKEN_NOT_CONFIGURED};
use crate::utils::mask_token;

pub const TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const TOKEN_FALLBACK_VAR: &str = "botToken";
pub const BASE_URL_VAR: &str = "TELEGRAM_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Source of configuration values. Empty values are reported as unset.
pub trait EnvProvider: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment, with `.env` loaded on construction.
#[derive(Debug, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        dotenv().ok();
        ProcessEnv
    }
}

impl Default for ProcessEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvProvider for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }
}

impl EnvProvider for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty()).cloned()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub token: String,
    pub base_url: String,
}

impl TelegramConfig {
    /// Reads the token (primary name first, then the fallback) and the
    /// optional base URL override. Called once per send; nothing is cached.
    pub fn resolve<E: EnvProvider + ?Sized>(env: &E) -> Result<Self, SendError> {
        let token = env
            .var(TOKEN_VAR)
            .or_else(|| env.var(TOKEN_FALLBACK_VAR))
            .ok_or_else(|| SendError::Configuration(TOKEN_NOT_CONFIGURED.to_string()))?;

        let base_url = env
            .var(BASE_URL_VAR)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(TelegramConfig { token, base_url })
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &mask_token(&self.token))
            .field("base_url", &self.base_url)
            .finish()
    }
}
