use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_id: i64,
    pub telegram_api_url: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,

    // Language detection / translation
    pub detection_api_key: String,
    pub detection_api_url: String,
    pub translate_api_url: String,

    // Commands
    pub command_prefix: String,
    pub max_pagination_sessions: usize,

    // Server
    pub port: u16,
}

/// Startup configuration failure. Each required item exits with its own code.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BOT TOKEN ERROR: BOT_TOKEN not set")]
    MissingBotToken,

    #[error("BOT ID ERROR: BOT_ID not set")]
    MissingBotId,

    #[error("BOT ID ERROR: BOT_ID is not an integer ({0})")]
    InvalidBotId(#[source] std::num::ParseIntError),

    #[error("API KEY ERROR: LANGUAGE_DETECTION_API_KEY not set")]
    MissingDetectionApiKey,

    #[error("CONFIG ERROR: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::MissingBotToken => 1,
            ConfigError::MissingBotId | ConfigError::InvalidBotId(_) => 2,
            ConfigError::MissingDetectionApiKey => 3,
            ConfigError::Invalid(_) => 4,
        }
    }
}

/// Value of `name`, treating an empty or blank variable as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = env_var("BOT_TOKEN").ok_or(ConfigError::MissingBotToken)?;
        let bot_id = env_var("BOT_ID")
            .ok_or(ConfigError::MissingBotId)?
            .trim()
            .parse::<i64>()
            .map_err(ConfigError::InvalidBotId)?;
        let detection_api_key =
            env_var("LANGUAGE_DETECTION_API_KEY").ok_or(ConfigError::MissingDetectionApiKey)?;

        let command_prefix = std::env::var("COMMAND_PREFIX").unwrap_or_else(|_| "-".to_string());
        if command_prefix.is_empty() || command_prefix.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "COMMAND_PREFIX must be non-empty without whitespace, got {command_prefix:?}"
            )));
        }

        Ok(Self {
            bot_token,
            bot_id,
            telegram_api_url: env_var("TELEGRAM_API_URL")
                .unwrap_or_else(|| "https://api.telegram.org".to_string()),
            webhook_url: env_var("WEBHOOK_URL"),
            webhook_secret: env_var("TELEGRAM_WEBHOOK_SECRET"),

            detection_api_key,
            detection_api_url: env_var("DETECTION_API_URL")
                .unwrap_or_else(|| "https://ws.detectlanguage.com/0.2/detect".to_string()),
            translate_api_url: env_var("TRANSLATE_API_URL").unwrap_or_else(|| {
                "https://translate.googleapis.com/translate_a/single".to_string()
            }),

            command_prefix,
            max_pagination_sessions: env_var("PAGINATION_MAX_SESSIONS")
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(256),

            port: env_var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        bot_token: "test-token".to_string(),
        bot_id: 4242,
        telegram_api_url: "http://127.0.0.1:1".to_string(),
        webhook_url: None,
        webhook_secret: None,
        detection_api_key: "test-detect-key".to_string(),
        detection_api_url: "http://127.0.0.1:1/detect".to_string(),
        translate_api_url: "http://127.0.0.1:1/translate".to_string(),
        command_prefix: "-".to_string(),
        max_pagination_sessions: 256,
        port: 8080,
    }
}
