//! Event system for token chain logging

use super::codes::Code;
use crate::diagnostics::FileLocation;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Core log event structure
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub location: Option<FileLocation>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn with_level(level: LogLevel, code: Code, message: &str) -> Self {
        let max_len = super::config::get_max_log_message_length();
        let message = match message.char_indices().nth(max_len) {
            Some((cut, _)) => &message[..cut],
            None => message,
        };

        Self::untruncated(level, code, message.to_string())
    }

    fn untruncated(level: LogLevel, code: Code, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            code,
            message,
            location: None,
            context: BTreeMap::new(),
        }
    }

    /// Create a new error event
    pub fn error(error_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Error, error_code, message)
    }

    /// Create a new warning event (warnings may not have codes)
    pub fn warning(message: &str) -> Self {
        Self::with_level(LogLevel::Warning, Code::new("W000"), message)
    }

    /// Create warning with specific code
    pub fn warning_with_code(warning_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Warning, warning_code, message)
    }

    /// Create a new info event
    pub fn info(message: &str) -> Self {
        Self::with_level(LogLevel::Info, Code::new("I000"), message)
    }

    /// Create a success event (info with success code)
    pub fn success(success_code: Code, message: &str) -> Self {
        Self::with_level(LogLevel::Info, success_code, message)
    }

    /// Create a debug event
    pub fn debug(message: &str) -> Self {
        Self::with_level(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Create a debug event for a multi-line dump such as a chain rendering.
    /// The message length limit does not apply.
    pub fn debug_block(message: String) -> Self {
        Self::untruncated(LogLevel::Debug, Code::new("D000"), message)
    }

    /// Attach a source location
    pub fn with_location(mut self, location: FileLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add context data
    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    /// Check if this event requires halting
    pub fn requires_halt(&self) -> bool {
        super::codes::requires_halt(self.code.as_str())
    }

    /// Get severity from error code
    pub fn severity(&self) -> &'static str {
        super::codes::get_severity(self.code.as_str()).as_str()
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        super::codes::get_category(self.code.as_str())
    }

    /// Get error description
    pub fn description(&self) -> &'static str {
        super::codes::get_description(self.code.as_str())
    }

    /// Get recommended action
    pub fn recommended_action(&self) -> &'static str {
        super::codes::get_action(self.code.as_str())
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        super::codes::is_recoverable(self.code.as_str())
    }

    /// Format for display
    pub fn format(&self) -> String {
        let location_str = self
            .location
            .as_ref()
            .map(|l| format!(" at {}", l))
            .unwrap_or_default();

        format!(
            "[{}] {} - {}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            location_str
        )
    }

    /// Format as JSON for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339(),
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": self.is_recoverable(),
                "requires_halt": self.requires_halt(),
                "description": self.description(),
                "recommended_action": self.recommended_action(),
            });
        }

        if let Some(location) = &self.location {
            json["location"] = serde_json::to_value(location)?;
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::Value::Object(
                self.context
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            );
        }

        serde_json::to_string(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_error_event_creation() {
        let event = LogEvent::error(codes::pattern::VARID_ZERO, "varid 0");

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E301");
        assert_eq!(event.message, "varid 0");
        assert_eq!(event.category(), "Pattern");
    }

    #[test]
    fn test_success_event_creation() {
        let event = LogEvent::success(codes::success::DUMP_LOADED, "Dump loaded");

        assert_eq!(event.level, LogLevel::Info);
        assert!(!event.is_error());
        assert_eq!(event.code.as_str(), "I020");
    }

    #[test]
    fn test_event_with_context() {
        let event = LogEvent::error(codes::dump::TOO_MANY_TOKENS, "Too many tokens")
            .with_context("count", "1024")
            .with_context("limit", "512");

        assert_eq!(event.context.get("count"), Some(&"1024".to_string()));
        assert_eq!(event.context.get("limit"), Some(&"512".to_string()));
    }

    #[test]
    fn test_event_formatting_with_location() {
        let event = LogEvent::error(codes::dump::UNBALANCED_BRACKET, "Unmatched ')'")
            .with_location(FileLocation::new("main.c", 12));
        let formatted = event.format();

        assert!(formatted.contains("[ERROR]"));
        assert!(formatted.contains("E042"));
        assert!(formatted.ends_with(" at main.c:12"));
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let max = crate::logging::config::get_max_log_message_length();
        let event = LogEvent::debug(&"é".repeat(max + 5));

        assert_eq!(event.message.chars().count(), max);
    }

    #[test]
    fn test_debug_block_keeps_whole_message() {
        let max = crate::logging::config::get_max_log_message_length();
        let block = "x\n".repeat(max);
        let event = LogEvent::debug_block(block.clone());

        assert_eq!(event.level, LogLevel::Debug);
        assert_eq!(event.message, block);
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "Missing")
            .with_location(FileLocation::new("a.dump", 3))
            .with_context("path", "a.dump");

        let json = event.format_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["code"], "E005");
        assert_eq!(value["location"]["line"], 3);
        assert_eq!(value["context"]["path"], "a.dump");
    }
}
