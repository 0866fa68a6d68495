//! Minimal Telegram Bot API client: only `sendMessage` is needed.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use dvmn_common::config::DEFAULT_TELEGRAM_API_URL;
use dvmn_common::error::SendError;
use dvmn_common::types::{ChatId, ParseMode};

use crate::sender::MessageSender;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<ParseMode>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramClient {
    http: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Result<Self, SendError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SendError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            token: token.into(),
        })
    }

    /// Point the client at another Bot API server (self-hosted or a test mock).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

impl MessageSender for TelegramClient {
    async fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), SendError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };

        // The request URL embeds the bot token, so it is stripped from errors.
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SendError::Transport(e.without_url().to_string()))?;

        match serde_json::from_str::<ApiResponse>(&body) {
            Ok(api) if status.is_success() && api.ok => {
                tracing::debug!(chat_id = %chat_id, "Message delivered");
                Ok(())
            }
            Ok(api) => Err(SendError::Api {
                status: status.as_u16(),
                description: api.description.unwrap_or(body),
            }),
            Err(_) => Err(SendError::Api {
                status: status.as_u16(),
                description: body,
            }),
        }
    }
}
