//! Structured diagnostics emitted by the token chain
//!
//! Checks built on the chain own the full reporting pipeline. This module
//! carries only what the chain itself needs to surface: a severity, a stable
//! id, a message and the source locations involved. Reporters decide where the
//! message goes.

use crate::logging::codes::{self, Code};
use crate::logging::{LogEvent, LogLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Stable id of internal errors raised by the chain
pub const INTERNAL_ERROR_ID: &str = "internalError";

/// A position in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileLocation {
    pub file: String,
    pub line: u32,
}

impl FileLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for FileLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Error,
    Warning,
    Style,
    Performance,
    Portability,
    Information,
    Debug,
}

impl Severity {
    /// Name used in rendered diagnostics. `None` renders as the empty string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Style => "style",
            Severity::Performance => "performance",
            Severity::Portability => "portability",
            Severity::Information => "information",
            Severity::Debug => "debug",
        }
    }

    /// Lenient parse: unknown names map to `None`
    pub fn parse(name: &str) -> Self {
        match name {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "style" => Severity::Style,
            "performance" => Severity::Performance,
            "portability" => Severity::Portability,
            "information" => Severity::Information,
            "debug" => Severity::Debug,
            _ => Severity::None,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            Severity::Error => LogLevel::Error,
            Severity::Information => LogLevel::Info,
            Severity::Debug | Severity::None => LogLevel::Debug,
            _ => LogLevel::Warning,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub call_stack: Vec<FileLocation>,
    pub severity: Severity,
    pub id: String,
    pub short_message: String,
    pub verbose_message: String,
    #[serde(skip)]
    pub code: Code,
}

impl ErrorMessage {
    /// The first line of `message` becomes the short message; the remainder,
    /// when present, the verbose one.
    pub fn new(
        call_stack: Vec<FileLocation>,
        severity: Severity,
        message: &str,
        id: impl Into<String>,
    ) -> Self {
        let (short_message, verbose_message) = match message.split_once('\n') {
            Some((short, verbose)) => (short.to_string(), verbose.to_string()),
            None => (message.to_string(), message.to_string()),
        };

        Self {
            call_stack,
            severity,
            id: id.into(),
            short_message,
            verbose_message,
            code: codes::system::INTERNAL_ERROR,
        }
    }

    /// Internal error with no location
    pub fn internal(message: &str) -> Self {
        Self::new(Vec::new(), Severity::Error, message, INTERNAL_ERROR_ID)
    }

    /// Attach the logging code used when this message is forwarded to the log
    pub fn with_code(mut self, code: Code) -> Self {
        self.code = code;
        self
    }

    /// `[a.c:1] -> [b.c:2]`
    pub fn call_stack_to_string(&self) -> String {
        self.call_stack
            .iter()
            .map(|loc| format!("[{}]", loc))
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn to_string(&self, verbose: bool) -> String {
        let mut text = String::new();

        if !self.call_stack.is_empty() {
            text.push_str(&self.call_stack_to_string());
            text.push_str(": ");
        }

        if self.severity != Severity::None {
            text.push_str(&format!("({}) ", self.severity));
        }

        text.push_str(if verbose {
            &self.verbose_message
        } else {
            &self.short_message
        });

        text
    }
}

/// Receives diagnostics raised by the chain
pub trait ErrorReporter: Send + Sync {
    fn report_error(&self, message: &ErrorMessage);
}

/// Forwards diagnostics to the global logging service
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingReporter;

impl LoggingReporter {
    /// Log event for a diagnostic: its code and short message, the innermost
    /// location and the diagnostic id as context
    pub fn event_for(message: &ErrorMessage) -> LogEvent {
        let text = message.short_message.as_str();
        let mut event = match message.severity.log_level() {
            LogLevel::Error => LogEvent::error(message.code, text),
            LogLevel::Warning => LogEvent::warning_with_code(message.code, text),
            LogLevel::Info => LogEvent::success(message.code, text),
            LogLevel::Debug => LogEvent::debug(text),
        }
        .with_context("id", &message.id);

        if let Some(location) = message.call_stack.last() {
            event = event.with_location(location.clone());
        }
        event
    }
}

impl ErrorReporter for LoggingReporter {
    fn report_error(&self, message: &ErrorMessage) {
        let event = Self::event_for(message);

        // Errors reach stderr even before the global logger exists
        if event.is_error() {
            crate::logging::safe_log_error(event);
        } else {
            crate::logging::dispatch(event);
        }
    }
}

/// Keeps every diagnostic in memory (tests and embedding hosts)
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<ErrorMessage>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_messages(&self) -> MutexGuard<'_, Vec<ErrorMessage>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn messages(&self) -> Vec<ErrorMessage> {
        self.lock_messages().clone()
    }

    pub fn count(&self) -> usize {
        self.lock_messages().len()
    }

    pub fn count_with_id(&self, id: &str) -> usize {
        self.lock_messages().iter().filter(|m| m.id == id).count()
    }

    pub fn clear(&self) {
        self.lock_messages().clear();
    }
}

impl ErrorReporter for MemoryReporter {
    fn report_error(&self, message: &ErrorMessage) {
        self.lock_messages().push(message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_names_round_trip() {
        for severity in [
            Severity::Error,
            Severity::Warning,
            Severity::Style,
            Severity::Performance,
            Severity::Portability,
            Severity::Information,
            Severity::Debug,
        ] {
            assert_eq!(Severity::parse(severity.as_str()), severity);
        }
        assert_eq!(Severity::parse(""), Severity::None);
        assert_eq!(Severity::parse("fatal"), Severity::None);
    }

    #[test]
    fn test_internal_message_shape() {
        let msg = ErrorMessage::internal("Internal error. Something broke.");

        assert!(msg.call_stack.is_empty());
        assert_eq!(msg.severity, Severity::Error);
        assert_eq!(msg.id, INTERNAL_ERROR_ID);
        assert_eq!(msg.to_string(false), "(error) Internal error. Something broke.");
    }

    #[test]
    fn test_message_split_and_call_stack() {
        let msg = ErrorMessage::new(
            vec![FileLocation::new("a.c", 1), FileLocation::new("b.c", 7)],
            Severity::Style,
            "short\nlonger explanation",
            "demo",
        );

        assert_eq!(msg.short_message, "short");
        assert_eq!(msg.verbose_message, "longer explanation");
        assert_eq!(
            msg.to_string(true),
            "[a.c:1] -> [b.c:7]: (style) longer explanation"
        );
    }

    #[test]
    fn test_message_serializes_without_code() {
        let msg = ErrorMessage::internal("x").with_code(codes::pattern::VARID_ZERO);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["severity"], "error");
        assert_eq!(value["id"], "internalError");
        assert!(value.get("code").is_none());
    }

    #[test]
    fn test_memory_reporter_collects() {
        let reporter = MemoryReporter::new();
        reporter.report_error(&ErrorMessage::internal("one"));
        reporter.report_error(&ErrorMessage::new(vec![], Severity::Warning, "two", "other"));

        assert_eq!(reporter.count(), 2);
        assert_eq!(reporter.count_with_id(INTERNAL_ERROR_ID), 1);

        reporter.clear();
        assert_eq!(reporter.count(), 0);
    }

    #[test]
    fn test_logging_reporter_without_global_logger() {
        LoggingReporter.report_error(&ErrorMessage::internal("no logger installed"));
        LoggingReporter.report_error(&ErrorMessage::new(
            vec![FileLocation::new("a.c", 2)],
            Severity::Information,
            "info",
            "note",
        ));
    }

    #[test]
    fn test_error_event_reaches_fallback_line() {
        let message = ErrorMessage::new(
            vec![FileLocation::new("a.c", 1), FileLocation::new("b.c", 9)],
            Severity::Error,
            "varid 0 used",
            INTERNAL_ERROR_ID,
        )
        .with_code(codes::pattern::VARID_ZERO);

        let event = LoggingReporter::event_for(&message);
        assert!(event.is_error());
        assert_eq!(event.context.get("id").map(String::as_str), Some(INTERNAL_ERROR_ID));

        let line = crate::logging::fallback_line(&event);
        assert!(line.contains("E301"));
        assert!(line.contains("varid 0 used"));
        assert!(line.ends_with("b.c:9"));
    }

    #[test]
    fn test_non_error_event_keeps_code() {
        let message = ErrorMessage::new(vec![], Severity::Warning, "odd", "note")
            .with_code(codes::pattern::VARID_ZERO);
        let event = LoggingReporter::event_for(&message);

        assert_eq!(event.level, LogLevel::Warning);
        assert_eq!(event.code, codes::pattern::VARID_ZERO);
        assert!(event.location.is_none());
    }
}
