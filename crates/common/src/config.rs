use crate::types::{ChatId, Severity};

pub const DEFAULT_DEVMAN_API_URL: &str = "https://dvmn.org/api/long_polling/";
pub const DEFAULT_DEVMAN_BASE_URL: &str = "https://dvmn.org/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_REPORTER_SOURCE: &str = "Notification Bot";
/// How long the platform holds a long-poll request open before answering with
/// a `timeout` response.
pub const DEFAULT_LONG_POLL_TIMEOUT_SECS: u64 = 100;

/// Maintainer bot settings. Absent when `LOGS_BOT_TOKEN` is not set.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Telegram token of the maintainer bot
    pub bot_token: String,

    /// Chat that receives error reports (default: the notification recipient)
    pub chat_id: ChatId,

    /// Reports below this severity are dropped
    pub min_severity: Severity,
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// dvmn.org API token
    pub devman_token: String,

    /// Telegram token of the notification bot
    pub bot_token: String,

    /// Chat that receives review notifications
    pub chat_id: ChatId,

    /// Error reporting bot, if configured
    pub reporter: Option<ReporterConfig>,

    /// Long-poll endpoint
    pub devman_api_url: String,

    /// Base URL that relative lesson links are resolved against
    pub devman_base_url: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Request timeout for a single long poll, in seconds (default: 100)
    pub long_poll_timeout_secs: u64,

    /// Pause between retries of transient polling failures (default: 0)
    pub poll_retry_delay_ms: u64,

    /// Pause before the supervisor restarts a failed cycle (default: 0)
    pub restart_delay_ms: u64,

    /// Name prefixed to every report sent to the maintainer
    pub reporter_source: String,
}

impl AppConfig {
    /// Load configuration from environment variables, honouring a `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };
        let number = |key: &str, default: u64| -> anyhow::Result<u64> {
            match var(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("{} must be a valid u64", key)),
                None => Ok(default),
            }
        };

        let chat_id = ChatId::new(required("AUTHOR_CHAT_ID")?);

        let reporter = match var("LOGS_BOT_TOKEN") {
            Some(bot_token) => Some(ReporterConfig {
                bot_token,
                chat_id: var("LOGS_CHAT_ID")
                    .map(ChatId::new)
                    .unwrap_or_else(|| chat_id.clone()),
                min_severity: match var("LOGS_MIN_SEVERITY") {
                    Some(raw) => raw
                        .parse()
                        .map_err(|e| anyhow::anyhow!("LOGS_MIN_SEVERITY: {}", e))?,
                    None => Severity::Error,
                },
            }),
            None => None,
        };

        Ok(Self {
            devman_token: required("DEVMAN_TOKEN")?,
            bot_token: required("BOT_TOKEN")?,
            chat_id,
            reporter,
            devman_api_url: var("DEVMAN_API_URL")
                .unwrap_or_else(|| DEFAULT_DEVMAN_API_URL.to_string()),
            devman_base_url: var("DEVMAN_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DEVMAN_BASE_URL.to_string()),
            telegram_api_url: var("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            long_poll_timeout_secs: number(
                "LONG_POLL_TIMEOUT_SECS",
                DEFAULT_LONG_POLL_TIMEOUT_SECS,
            )?,
            poll_retry_delay_ms: number("POLL_RETRY_DELAY_MS", 0)?,
            restart_delay_ms: number("RESTART_DELAY_MS", 0)?,
            reporter_source: var("REPORTER_SOURCE")
                .unwrap_or_else(|| DEFAULT_REPORTER_SOURCE.to_string()),
        })
    }
}
