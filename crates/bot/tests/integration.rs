//! End-to-end tests: the production supervisor from `app::build`, wired to a
//! mock long-polling endpoint and a mock Bot API on the same server.

use std::collections::HashMap;

use httpmock::prelude::*;
use serde_json::json;

use dvmn_bot::app;
use dvmn_common::config::AppConfig;
use dvmn_common::error::{DispatchError, PollError, SendError};

const POLL_PATH: &str = "/api/long_polling/";
const BOT_TOKEN: &str = "111:notify";
const LOGS_BOT_TOKEN: &str = "222:logs";

fn config(server: &MockServer) -> AppConfig {
    let env: HashMap<&str, String> = HashMap::from([
        ("DEVMAN_TOKEN", "dvmn-secret".to_string()),
        ("BOT_TOKEN", BOT_TOKEN.to_string()),
        ("AUTHOR_CHAT_ID", "424242".to_string()),
        ("LOGS_BOT_TOKEN", LOGS_BOT_TOKEN.to_string()),
        ("LOGS_CHAT_ID", "999".to_string()),
        ("DEVMAN_API_URL", server.url(POLL_PATH)),
        ("TELEGRAM_API_URL", server.base_url()),
        ("LONG_POLL_TIMEOUT_SECS", "5".to_string()),
    ]);
    AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}

#[tokio::test]
async fn test_send_failure_is_reported_to_maintainer() {
    let server = MockServer::start_async().await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(POLL_PATH)
                .header("Authorization", "Token dvmn-secret");
            then.status(200).json_body(json!({
                "status": "found",
                "new_attempts": [{
                    "is_negative": true,
                    "lesson_title": "OOP Basics",
                    "lesson_url": "/lessons/42/"
                }],
                "last_attempt_timestamp": 1555522656.114917
            }));
        })
        .await;
    let notify = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/sendMessage", BOT_TOKEN))
                .body_contains("https://dvmn.org/lessons/42/")
                .body_contains("\"parse_mode\":\"Markdown\"");
            then.status(400).json_body(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            }));
        })
        .await;
    let report = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/sendMessage", LOGS_BOT_TOKEN))
                .body_contains("\"chat_id\":\"999\"")
                .body_contains("Notification Bot:\\n")
                .body_contains("chat not found");
            then.status(200).json_body(json!({"ok": true, "result": {}}));
        })
        .await;

    let mut supervisor = app::build(&config(&server)).unwrap();
    let err = supervisor.run_cycle().await;

    assert!(matches!(
        err,
        DispatchError::Send(SendError::Api { status: 400, .. })
    ));
    poll.assert_async().await;
    notify.assert_async().await;
    report.assert_async().await;
    assert_eq!(
        supervisor.poller().cursor().map(|c| c.as_str()),
        Some("1555522656.114917")
    );
}

#[tokio::test]
async fn test_platform_error_is_reported_to_maintainer() {
    let server = MockServer::start_async().await;
    let poll = server
        .mock_async(|when, then| {
            when.method(GET).path(POLL_PATH);
            then.status(500).body("Internal Server Error");
        })
        .await;
    let report = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("/bot{}/sendMessage", LOGS_BOT_TOKEN))
                .body_contains("500");
            then.status(200).json_body(json!({"ok": true, "result": {}}));
        })
        .await;

    let mut supervisor = app::build(&config(&server)).unwrap();
    let err = supervisor.run_cycle().await;

    assert!(matches!(
        err,
        DispatchError::Poll(PollError::Status { status: 500, .. })
    ));
    poll.assert_async().await;
    report.assert_async().await;
    assert_eq!(supervisor.poller().cursor(), None);
}

#[tokio::test]
async fn test_build_without_reporter() {
    let server = MockServer::start_async().await;
    let env: HashMap<&str, String> = HashMap::from([
        ("DEVMAN_TOKEN", "t".to_string()),
        ("BOT_TOKEN", BOT_TOKEN.to_string()),
        ("AUTHOR_CHAT_ID", "1".to_string()),
        ("DEVMAN_API_URL", server.url(POLL_PATH)),
    ]);
    let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();

    let supervisor = app::build(&config).unwrap();

    assert!(supervisor.sink().is_none());
    assert_eq!(supervisor.dispatcher().chat_id().as_str(), "1");
}

#[tokio::test]
async fn test_build_rejects_bad_base_url() {
    let env: HashMap<&str, String> = HashMap::from([
        ("DEVMAN_TOKEN", "t".to_string()),
        ("BOT_TOKEN", BOT_TOKEN.to_string()),
        ("AUTHOR_CHAT_ID", "1".to_string()),
        ("DEVMAN_BASE_URL", "dvmn.org without scheme".to_string()),
    ]);
    let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();

    assert!(app::build(&config).is_err());
}

#[tokio::test]
async fn test_build_rejects_bad_api_url() {
    for (key, value) in [
        ("DEVMAN_API_URL", "dvmn.org/api/long_polling/"),
        ("TELEGRAM_API_URL", "api.telegram.org"),
    ] {
        let env: HashMap<&str, String> = HashMap::from([
            ("DEVMAN_TOKEN", "t".to_string()),
            ("BOT_TOKEN", BOT_TOKEN.to_string()),
            ("AUTHOR_CHAT_ID", "1".to_string()),
            (key, value.to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap();

        let err = app::build(&config).err().unwrap();
        assert!(err.to_string().contains(key), "unexpected error: {}", err);
    }
}
