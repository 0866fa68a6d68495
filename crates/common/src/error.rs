use thiserror::Error;

/// Failures while fetching a long-poll response from the review platform.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl PollError {
    /// Transient failures are retried by the poller without surfacing them.
    pub fn is_transient(&self) -> bool {
        matches!(self, PollError::Connect(_) | PollError::Timeout(_))
    }
}

/// Failures while turning an attempt into notification text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Attempt is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Cannot resolve lesson url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures while delivering a message through the messaging service.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Messaging API rejected message (status {status}): {description}")]
    Api { status: u16, description: String },
}

/// Anything that ends a dispatch cycle.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Polling failed: {0}")]
    Poll(#[from] PollError),

    #[error("Formatting failed: {0}")]
    Format(#[from] FormatError),

    #[error("Sending failed: {0}")]
    Send(#[from] SendError),
}
