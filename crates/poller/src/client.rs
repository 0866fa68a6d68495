//! HTTP client for the dvmn.org long-polling endpoint.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::AUTHORIZATION;

use dvmn_common::error::PollError;
use dvmn_common::types::{Cursor, PollResponse};

use crate::poller::AttemptFeed;

/// Issues one authenticated long-poll request per [`AttemptFeed::fetch`] call.
pub struct DvmnClient {
    http: Client,
    url: String,
    token: String,
}

impl DvmnClient {
    /// `timeout` bounds the whole request, so it must cover the server's hold
    /// time or every quiet poll ends in a (retried) client-side timeout.
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PollError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollError::Request(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
            token: token.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AttemptFeed for DvmnClient {
    async fn fetch(&self, cursor: Option<&Cursor>) -> Result<PollResponse, PollError> {
        let mut request = self
            .http
            .get(&self.url)
            .header(AUTHORIZATION, format!("Token {}", self.token));

        if let Some(cursor) = cursor {
            request = request.query(&[("timestamp", cursor.as_str())]);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PollError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(classify)?;
        serde_json::from_str(&body).map_err(|e| PollError::Decode(e.to_string()))
    }
}

/// Sort a transport error into the transient classes the poller retries.
fn classify(err: reqwest::Error) -> PollError {
    if err.is_timeout() {
        PollError::Timeout(err.to_string())
    } else if err.is_connect() {
        PollError::Connect(err.to_string())
    } else {
        PollError::Request(err.to_string())
    }
}
