//! Builds the production supervisor from configuration.

use std::time::Duration;

use anyhow::Context;
use reqwest::Url;

use dvmn_common::config::AppConfig;
use dvmn_engine::{Dispatcher, MessageFormatter};
use dvmn_notifier::{TelegramClient, TelegramReporter};
use dvmn_poller::{AttemptPoller, DvmnClient, RetryPolicy};

use crate::supervisor::Supervisor;

pub type BotSupervisor =
    Supervisor<DvmnClient, TelegramClient, Option<TelegramReporter<TelegramClient>>>;

pub fn build(config: &AppConfig) -> anyhow::Result<BotSupervisor> {
    // Both endpoints must be absolute URLs.
    Url::parse(&config.devman_api_url)
        .with_context(|| format!("DEVMAN_API_URL is not a valid URL: {}", config.devman_api_url))?;
    Url::parse(&config.telegram_api_url).with_context(|| {
        format!("TELEGRAM_API_URL is not a valid URL: {}", config.telegram_api_url)
    })?;

    let client = DvmnClient::new(
        config.devman_api_url.clone(),
        config.devman_token.clone(),
        Duration::from_secs(config.long_poll_timeout_secs),
    )?;
    let retry = RetryPolicy::unbounded().with_delay(Duration::from_millis(config.poll_retry_delay_ms));
    let poller = AttemptPoller::new(client).with_retry_policy(retry);

    let bot = TelegramClient::new(config.bot_token.clone())?
        .with_api_url(config.telegram_api_url.clone());
    let formatter = MessageFormatter::new(&config.devman_base_url)?;
    let dispatcher = Dispatcher::new(bot, config.chat_id.clone(), formatter);

    let reporter = match &config.reporter {
        Some(reporter) => {
            let logs_bot = TelegramClient::new(reporter.bot_token.clone())?
                .with_api_url(config.telegram_api_url.clone());
            Some(
                TelegramReporter::new(logs_bot, reporter.chat_id.clone())
                    .with_min_severity(reporter.min_severity),
            )
        }
        None => {
            tracing::warn!("LOGS_BOT_TOKEN not set, failures are only logged locally");
            None
        }
    };

    Ok(Supervisor::new(poller, dispatcher, reporter)
        .with_source(config.reporter_source.clone())
        .with_restart_delay(Duration::from_millis(config.restart_delay_ms)))
}
