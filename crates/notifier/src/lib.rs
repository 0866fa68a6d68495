//! Outbound side of the relay: delivering text through the Telegram Bot API
//! and forwarding diagnostics to the maintainer chat.

pub mod reporter;
pub mod sender;
pub mod telegram;

pub use reporter::{DiagnosticSink, TelegramReporter};
pub use sender::MessageSender;
pub use telegram::TelegramClient;
