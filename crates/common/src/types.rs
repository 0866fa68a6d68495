use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque long-poll cursor handed out by the review platform.
///
/// The platform sends it as a JSON number (a unix timestamp with a fractional
/// part) or occasionally as a string. It is kept verbatim and echoed back as the
/// `timestamp` query parameter; nothing local ever interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Cursor(text),
            Raw::Number(number) => Cursor(number.to_string()),
        })
    }
}

/// Outcome reported by the long-poll endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Found,
    Timeout,
    #[serde(other)]
    Unknown,
}

/// A single reviewed attempt.
///
/// Every field is optional on the wire; missing values are reported when the
/// attempt is formatted, not when the response is decoded, so attempts earlier
/// in the same batch are still delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    #[serde(default)]
    pub lesson_title: Option<String>,
    #[serde(default)]
    pub lesson_url: Option<String>,
    #[serde(default)]
    pub is_negative: Option<bool>,
}

impl Attempt {
    pub fn new(title: impl Into<String>, url: impl Into<String>, is_negative: bool) -> Self {
        Self {
            lesson_title: Some(title.into()),
            lesson_url: Some(url.into()),
            is_negative: Some(is_negative),
        }
    }
}

/// Body of one long-poll response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PollResponse {
    #[serde(default)]
    pub status: Option<PollStatus>,
    #[serde(default)]
    pub timestamp_to_request: Option<Cursor>,
    #[serde(default)]
    pub last_attempt_timestamp: Option<Cursor>,
    #[serde(default)]
    pub new_attempts: Option<Vec<Attempt>>,
}

impl PollResponse {
    /// Attempts carried by this response; an absent or null list is empty.
    pub fn attempts(&self) -> &[Attempt] {
        self.new_attempts.as_deref().unwrap_or_default()
    }

    /// Cursor to send with the next request, if the response carries one.
    ///
    /// `timeout` responses carry `timestamp_to_request`; `found` responses
    /// carry `last_attempt_timestamp` instead.
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.timestamp_to_request
            .as_ref()
            .or(self.last_attempt_timestamp.as_ref())
    }
}

/// Messaging service chat identifier (numeric id or `@channel` name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Markup dialect of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    Markdown,
    MarkdownV2,
    #[serde(rename = "HTML")]
    Html,
}

/// Severity of a diagnostic report, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Debug => write!(f, "debug"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_accepts_number_and_string() {
        let from_number: Cursor = serde_json::from_str("1555493856.1163").unwrap();
        assert_eq!(from_number.as_str(), "1555493856.1163");

        let from_string: Cursor = serde_json::from_str("\"T1\"").unwrap();
        assert_eq!(from_string, Cursor::new("T1"));
    }

    #[test]
    fn test_timeout_response_cursor() {
        let response: PollResponse = serde_json::from_value(serde_json::json!({
            "status": "timeout",
            "timestamp_to_request": 1555609162.0,
            "request_query": []
        }))
        .unwrap();

        assert_eq!(response.status, Some(PollStatus::Timeout));
        assert!(response.attempts().is_empty());
        assert_eq!(response.next_cursor(), Some(&Cursor::new("1555609162.0")));
    }

    #[test]
    fn test_found_response_falls_back_to_last_attempt_timestamp() {
        let response: PollResponse = serde_json::from_value(serde_json::json!({
            "status": "found",
            "new_attempts": [{
                "submitted_at": "2019-04-17T20:37:36.114917+03:00",
                "timestamp": 1555522656.114917,
                "is_negative": true,
                "lesson_title": "Отправляем уведомления о проверке работ",
                "lesson_url": "/modules/python-chatbots/lesson/devman-bot/"
            }],
            "last_attempt_timestamp": 1555522656.114917
        }))
        .unwrap();

        assert_eq!(response.status, Some(PollStatus::Found));
        assert_eq!(response.attempts().len(), 1);
        assert_eq!(response.attempts()[0].is_negative, Some(true));
        assert_eq!(
            response.next_cursor(),
            Some(&Cursor::new("1555522656.114917"))
        );
    }

    #[test]
    fn test_null_attempts_are_empty() {
        let response: PollResponse =
            serde_json::from_str(r#"{"new_attempts": null, "status": "weird"}"#).unwrap();
        assert!(response.attempts().is_empty());
        assert_eq!(response.status, Some(PollStatus::Unknown));
        assert_eq!(response.next_cursor(), None);
    }

    #[test]
    fn test_attempt_with_missing_fields_still_decodes() {
        let attempt: Attempt = serde_json::from_str(r#"{"lesson_title": "OOP"}"#).unwrap();
        assert_eq!(attempt.lesson_title.as_deref(), Some("OOP"));
        assert_eq!(attempt.lesson_url, None);
        assert_eq!(attempt.is_negative, None);
    }

    #[test]
    fn test_severity_ordering_and_parsing() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Debug < Severity::Info);
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("loud".parse::<Severity>().is_err());
        assert_eq!(Severity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_parse_mode_wire_names() {
        assert_eq!(
            serde_json::to_value(ParseMode::Markdown).unwrap(),
            serde_json::json!("Markdown")
        );
        assert_eq!(
            serde_json::to_value(ParseMode::Html).unwrap(),
            serde_json::json!("HTML")
        );
    }
}
