use std::future::Future;

use dvmn_common::error::PollError;
use dvmn_common::types::{Cursor, PollResponse};

use crate::retry::RetryPolicy;

/// Source of long-poll responses.
///
/// Implemented by [`crate::DvmnClient`] for the real platform and by in-memory
/// fakes in tests. One call is one request; retries are the poller's business.
pub trait AttemptFeed {
    fn fetch(
        &self,
        cursor: Option<&Cursor>,
    ) -> impl Future<Output = Result<PollResponse, PollError>> + Send;
}

/// Pull-based long poller that threads the cursor from one response into the
/// next request.
///
/// Each [`AttemptPoller::next_response`] call issues requests one at a time
/// until it gets a response or a non-transient error. The cursor is only ever
/// replaced by one taken from a successfully decoded response, and always
/// before the next request goes out.
pub struct AttemptPoller<F> {
    feed: F,
    retry: RetryPolicy,
    cursor: Option<Cursor>,
}

impl<F: AttemptFeed> AttemptPoller<F> {
    /// Poller starting from an absent cursor, i.e. the earliest results.
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            retry: RetryPolicy::default(),
            cursor: None,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Fetch the next response, retrying transient failures per the policy.
    ///
    /// A response without any cursor leaves the current one in place. When a
    /// bounded policy runs out, the last transient error is returned.
    pub async fn next_response(&mut self) -> Result<PollResponse, PollError> {
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            match self.feed.fetch(self.cursor.as_ref()).await {
                Ok(response) => {
                    if let Some(next) = response.next_cursor() {
                        self.cursor = Some(next.clone());
                    }
                    tracing::debug!(
                        attempts = response.attempts().len(),
                        cursor = ?self.cursor.as_ref().map(Cursor::as_str),
                        "Received long-poll response"
                    );
                    return Ok(response);
                }
                Err(e) if e.is_transient() && self.retry.should_retry(attempts) => {
                    tracing::debug!(attempt = attempts, error = %e, "Transient polling failure, retrying");
                    if !self.retry.delay.is_zero() {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}
