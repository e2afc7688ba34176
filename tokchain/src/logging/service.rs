//! Logging service implementation

use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::Arc;

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service with configuration-aware settings
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let mut multi = MultiLogger::new(min_level);

        if config::use_console_logging() {
            multi = if config::use_structured_logging() {
                multi.with_structured_console(min_level)
            } else {
                multi.with_console(min_level)
            };
        }

        if let Some(path) = config::log_file_path() {
            match multi.with_file(&path, min_level, config::use_structured_logging()) {
                Ok(with_file) => multi = with_file,
                Err(err) => {
                    eprintln!(
                        "[WARN] W000 - Cannot open log file {}: {}",
                        path.display(),
                        err
                    );
                    multi = MultiLogger::new(min_level).with_console(min_level);
                }
            }
        }

        Self::new(Arc::new(multi), min_level)
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Simple console logger
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            // stdout is reserved for match and render output
            eprintln!("{}", event.format());
        }
    }
}

/// Structured logger for JSON output and better tooling integration
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.format_json() {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", event.format()),
            }
        }
    }
}

/// File logger for persistent logging
pub struct FileLogger {
    file_path: std::path::PathBuf,
    min_level: LogLevel,
    structured: bool,
}

impl FileLogger {
    pub fn new<P: AsRef<std::path::Path>>(
        file_path: P,
        min_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let path = file_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Test write access
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            file_path: path,
            min_level,
            structured,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let output = if self.structured {
                event.format_json().unwrap_or_else(|_| event.format())
            } else {
                event.format()
            };

            // Write errors are dropped to avoid logging recursion
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                use std::io::Write;
                let _ = writeln!(file, "{}", output);
            }
        }
    }
}

/// Multi-target logger that can log to multiple destinations
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl MultiLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            loggers: Vec::new(),
            min_level,
        }
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.loggers.push(logger);
    }

    pub fn with_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(ConsoleLogger::new(console_level)));
        self
    }

    pub fn with_structured_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(StructuredLogger::new(console_level)));
        self
    }

    pub fn with_file<P: AsRef<std::path::Path>>(
        mut self,
        file_path: P,
        file_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let file_logger = FileLogger::new(file_path, file_level, structured)?;
        self.add_logger(Arc::new(file_logger));
        Ok(self)
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            for logger in &self.loggers {
                logger.log(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureLogger {
        events: Mutex<Vec<LogEvent>>,
    }

    impl CaptureLogger {
        fn codes(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.code.as_str().to_string())
                .collect()
        }
    }

    impl Logger for CaptureLogger {
        fn log(&self, event: &LogEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let first = Arc::new(CaptureLogger::default());
        let second = Arc::new(CaptureLogger::default());
        let mut multi = MultiLogger::new(LogLevel::Debug);
        multi.add_logger(first.clone());
        multi.add_logger(second.clone());

        multi.log(&LogEvent::info("Test message"));

        assert_eq!(first.codes(), vec!["I000"]);
        assert_eq!(second.codes(), vec!["I000"]);
    }

    #[test]
    fn test_multi_logger_filters_before_fan_out() {
        let capture = Arc::new(CaptureLogger::default());
        let mut multi = MultiLogger::new(LogLevel::Warning);
        multi.add_logger(capture.clone());

        multi.log(&LogEvent::debug("dropped"));
        multi.log(&LogEvent::warning("kept"));

        assert_eq!(capture.codes(), vec!["W000"]);
    }

    #[test]
    fn test_logging_service_filters_by_level() {
        let capture = Arc::new(CaptureLogger::default());
        let service = LoggingService::new(capture.clone(), LogLevel::Error);

        service.log_event(LogEvent::debug("Debug message"));
        service.log_event(LogEvent::info("Info message"));
        service.log_event(LogEvent::warning("Warning message"));
        service.log_event(LogEvent::error(codes::system::INTERNAL_ERROR, "Error message"));

        assert_eq!(capture.codes(), vec![codes::system::INTERNAL_ERROR.as_str()]);
        assert!(service.should_log(LogLevel::Error));
        assert!(!service.should_log(LogLevel::Warning));
    }

    #[test]
    fn test_logging_service_passes_success_codes() {
        let capture = Arc::new(CaptureLogger::default());
        let service = LoggingService::new(capture.clone(), LogLevel::Info);

        service.log_event(LogEvent::success(codes::success::RENDER_COMPLETE, "Rendered"));

        assert_eq!(capture.codes(), vec![codes::success::RENDER_COMPLETE.as_str()]);
    }

    #[test]
    fn test_with_config_defaults_to_console() {
        let service = LoggingService::with_config();
        assert!(service.should_log(LogLevel::Error));
    }

    #[test]
    fn test_file_logger_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("tokchain.log");

        let logger = FileLogger::new(&path, LogLevel::Info, false).unwrap();
        logger.log(&LogEvent::info("first"));
        logger.log(&LogEvent::debug("filtered"));
        logger.log(&LogEvent::info("second"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("first"));
        assert!(!content.contains("filtered"));
    }

    #[test]
    fn test_structured_file_logger_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("structured.log");

        let logger = FileLogger::new(&path, LogLevel::Debug, true).unwrap();
        logger.log(&LogEvent::error(codes::dump::INVALID_VARID, "bad varid"));

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(value["code"], "E021");
    }
}
