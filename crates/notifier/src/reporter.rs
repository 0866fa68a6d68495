//! Diagnostic reporting to the maintainer chat.
//!
//! The supervisor holds a [`DiagnosticSink`] and calls it explicitly when a
//! notification cycle fails, instead of hooking a global logger. Delivery
//! failures are logged locally and never reported again.

use std::future::Future;

use dvmn_common::types::{ChatId, Severity};

use crate::sender::MessageSender;

/// Telegram refuses messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

pub trait DiagnosticSink {
    fn report(
        &self,
        severity: Severity,
        source: &str,
        text: &str,
    ) -> impl Future<Output = ()> + Send;
}

/// An unconfigured sink drops every report.
impl<D: DiagnosticSink + Sync> DiagnosticSink for Option<D> {
    async fn report(&self, severity: Severity, source: &str, text: &str) {
        if let Some(sink) = self {
            sink.report(severity, source, text).await;
        }
    }
}

/// Sends `<source>:\n<text>` to the maintainer chat for every report at or
/// above `min_severity`.
pub struct TelegramReporter<S> {
    sender: S,
    chat_id: ChatId,
    min_severity: Severity,
}

impl<S: MessageSender> TelegramReporter<S> {
    pub fn new(sender: S, chat_id: ChatId) -> Self {
        Self {
            sender,
            chat_id,
            min_severity: Severity::Error,
        }
    }

    pub fn with_min_severity(mut self, min_severity: Severity) -> Self {
        self.min_severity = min_severity;
        self
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }
}

impl<S: MessageSender + Sync> DiagnosticSink for TelegramReporter<S> {
    async fn report(&self, severity: Severity, source: &str, text: &str) {
        if severity < self.min_severity {
            return;
        }

        let message = truncate(&format!("{}:\n{}", source, text), MAX_MESSAGE_CHARS);

        // Plain text: error output is arbitrary and would break Markdown parsing.
        if let Err(e) = self
            .sender
            .send_message(&self.chat_id, &message, None)
            .await
        {
            tracing::warn!(
                error = %e,
                severity = %severity,
                "Failed to deliver diagnostic report to maintainer"
            );
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
