use std::future::Future;

use dvmn_common::error::SendError;
use dvmn_common::types::{ChatId, ParseMode};

/// Delivers a single text message to a chat.
///
/// `parse_mode` must match the markup used in `text`; `None` sends plain text.
pub trait MessageSender {
    fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> impl Future<Output = Result<(), SendError>> + Send;
}
