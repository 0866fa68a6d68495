//! Notification dispatch.
//!
//! Pulls responses from an [`AttemptPoller`] one at a time and, for each
//! attempt in list order, formats it and sends it to the recipient chat.
//! The first failure of any kind ends the run; nothing is retried here.

use std::convert::Infallible;

use dvmn_common::error::DispatchError;
use dvmn_common::types::{ChatId, ParseMode, PollResponse};
use dvmn_notifier::MessageSender;
use dvmn_poller::{AttemptFeed, AttemptPoller};

use crate::formatter::MessageFormatter;

pub struct Dispatcher<S> {
    sender: S,
    chat_id: ChatId,
    formatter: MessageFormatter,
}

impl<S: MessageSender> Dispatcher<S> {
    pub fn new(sender: S, chat_id: ChatId, formatter: MessageFormatter) -> Self {
        Self {
            sender,
            chat_id,
            formatter,
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    /// Deliver every attempt in one response. Returns how many were sent.
    ///
    /// Stops at the first attempt that cannot be formatted or sent; attempts
    /// after it are not tried.
    pub async fn dispatch(&self, response: &PollResponse) -> Result<usize, DispatchError> {
        let mut sent = 0;

        for attempt in response.attempts() {
            let text = self.formatter.format(attempt)?;
            self.sender
                .send_message(&self.chat_id, &text, Some(ParseMode::Markdown))
                .await?;
            sent += 1;

            tracing::info!(
                lesson = attempt.lesson_title.as_deref().unwrap_or_default(),
                is_negative = attempt.is_negative.unwrap_or_default(),
                "Review notification sent"
            );
        }

        Ok(sent)
    }

    /// Poll and dispatch until something fails.
    pub async fn run<F: AttemptFeed>(
        &self,
        poller: &mut AttemptPoller<F>,
    ) -> Result<Infallible, DispatchError> {
        tracing::info!("Start long polling");

        loop {
            let response = poller.next_response().await?;
            if !response.attempts().is_empty() {
                tracing::debug!(
                    count = response.attempts().len(),
                    "Received new attempt results"
                );
            }
            self.dispatch(&response).await?;
        }
    }
}
