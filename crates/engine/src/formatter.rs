//! Turns a reviewed attempt into notification text.
//!
//! Output uses Telegram's legacy Markdown: the lesson title becomes a link to
//! the lesson page, followed by one of two fixed verdict sentences. Markup
//! characters in the title are escaped so the message always parses.

use reqwest::Url;

use dvmn_common::error::FormatError;
use dvmn_common::types::Attempt;

pub const NEGATIVE_VERDICT: &str = "К сожалению в работе нашлись ошибки.";
pub const POSITIVE_VERDICT: &str =
    "Преподавателю все понравилось, можно приступать к следующему уроку!";

/// Formats attempts against a fixed base URL.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    base_url: Url,
}

impl MessageFormatter {
    pub fn new(base_url: &str) -> Result<Self, FormatError> {
        let base_url = Url::parse(base_url).map_err(|e| FormatError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { base_url })
    }

    /// Render one attempt. Pure: no I/O, same input gives the same text.
    pub fn format(&self, attempt: &Attempt) -> Result<String, FormatError> {
        let title = attempt
            .lesson_title
            .as_deref()
            .ok_or(FormatError::MissingField("lesson_title"))?;
        let relative = attempt
            .lesson_url
            .as_deref()
            .ok_or(FormatError::MissingField("lesson_url"))?;
        let is_negative = attempt
            .is_negative
            .ok_or(FormatError::MissingField("is_negative"))?;

        let lesson_url = self
            .base_url
            .join(relative)
            .map_err(|e| FormatError::InvalidUrl {
                url: relative.to_string(),
                reason: e.to_string(),
            })?;

        let verdict = if is_negative {
            NEGATIVE_VERDICT
        } else {
            POSITIVE_VERDICT
        };

        Ok(format!(
            "У вас проверили работу [«{}»]({}).\n\n{}",
            escape_markdown(title),
            lesson_url,
            verdict
        ))
    }
}

/// Backslash-escape the characters that open an entity in legacy Markdown.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
