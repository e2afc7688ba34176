//! Consolidated error codes and classification system
//!
//! Single source of truth for all codes emitted by the token chain, their metadata,
//! and classification functions.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File and configuration error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E006");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_CONFIG: Code = Code::new("E015");
}

/// Token dump reader error codes
pub mod dump {
    use super::Code;

    pub const INVALID_LINE_MARKER: Code = Code::new("E020");
    pub const INVALID_VARID: Code = Code::new("E021");
    pub const UNKNOWN_FILE: Code = Code::new("E022");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const UNBALANCED_BRACKET: Code = Code::new("E042");
    pub const NESTING_TOO_DEEP: Code = Code::new("E043");
}

/// Token value error codes
pub mod token {
    use super::Code;

    pub const MALFORMED_STRING_LITERAL: Code = Code::new("E060");
}

/// Chain integrity error codes
pub mod list {
    use super::Code;

    pub const BROKEN_CHAIN: Code = Code::new("E070");
    pub const TAIL_MISMATCH: Code = Code::new("E071");
    pub const ASYMMETRIC_LINK: Code = Code::new("E072");
    pub const STALE_HANDLE: Code = Code::new("E073");
    pub const HEAD_MISMATCH: Code = Code::new("E074");
    pub const SELF_LINK: Code = Code::new("E075");
}

/// Pattern matcher error codes
pub mod pattern {
    use super::Code;

    pub const VARID_ZERO: Code = Code::new("E301");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const CONFIG_LOADED: Code = Code::new("I010");
    pub const DUMP_LOADED: Code = Code::new("I020");
    pub const LIST_VALIDATED: Code = Code::new("I030");
    pub const MATCH_SCAN_COMPLETE: Code = Code::new("I040");
    pub const RENDER_COMPLETE: Code = Code::new("I050");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn register(registry: &mut HashMap<&'static str, ErrorMetadata>, metadata: ErrorMetadata) {
    registry.insert(metadata.code, metadata);
}

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        register(
            &mut registry,
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the failing token dump",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failure",
                "Check logging configuration and environment variables",
            ),
        );

        // File processing errors
        register(
            &mut registry,
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File not found at specified path",
                "Check file path and ensure file exists",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "File exceeds maximum allowed size",
                "Split the dump or raise the size limit",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File is not valid UTF-8",
                "Convert the file to UTF-8",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "I/O error while reading file",
                "Check file permissions and disk state",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E015",
                "Configuration",
                Severity::High,
                false,
                true,
                "Configuration file could not be parsed",
                "Fix the TOML syntax or remove unknown keys",
            ),
        );

        // Dump reader errors
        register(
            &mut registry,
            ErrorMetadata::new(
                "E020",
                "Dump",
                Severity::Medium,
                false,
                true,
                "Malformed line marker in token dump",
                "Line markers must be a positive integer followed by ':'",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E021",
                "Dump",
                Severity::Medium,
                false,
                true,
                "Malformed variable id suffix in token dump",
                "Variable ids must be written as token@<number>",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E022",
                "Dump",
                Severity::Medium,
                false,
                true,
                "File header names a file that is not in the file table",
                "Pass the file table used when the dump was rendered",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E027",
                "Dump",
                Severity::High,
                false,
                true,
                "Token dump exceeds the maximum token count",
                "Split the input into smaller translation units",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E042",
                "Dump",
                Severity::Medium,
                false,
                true,
                "Unbalanced bracket in token dump",
                "Check that every opening delimiter has a matching closer",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E043",
                "Dump",
                Severity::High,
                false,
                true,
                "Bracket nesting in token dump exceeds the maximum depth",
                "Load the dump without bracket linking or reduce nesting",
            ),
        );

        // Token errors
        register(
            &mut registry,
            ErrorMetadata::new(
                "E060",
                "Token",
                Severity::High,
                true,
                false,
                "Token is not a well-formed quoted string literal",
                "Only call string literal operations on %str% tokens",
            ),
        );

        // Chain integrity errors
        register(
            &mut registry,
            ErrorMetadata::new(
                "E070",
                "List",
                Severity::Critical,
                false,
                true,
                "next/previous pointers disagree",
                "An editing primitive broke chain continuity; file a bug report",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E071",
                "List",
                Severity::Critical,
                false,
                true,
                "Stored tail is not the last reachable token",
                "An editing primitive failed to update the tail; file a bug report",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E072",
                "List",
                Severity::Critical,
                false,
                true,
                "Bracket link is not mutual",
                "Re-establish links with create_mutual_links",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E073",
                "List",
                Severity::Critical,
                false,
                true,
                "Token handle refers to a freed slot",
                "Do not keep handles to deleted tokens",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E074",
                "List",
                Severity::Critical,
                false,
                true,
                "Stored head has a predecessor",
                "An editing primitive failed to update the head; file a bug report",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "E075",
                "List",
                Severity::Critical,
                false,
                true,
                "Token is linked to itself",
                "Clear the link before absorbing a linked successor",
            ),
        );

        // Pattern errors
        register(
            &mut registry,
            ErrorMetadata::new(
                "E301",
                "Pattern",
                Severity::High,
                true,
                false,
                "%varid% used without a resolved variable id",
                "Pass the variable id of the token being tracked",
            ),
        );

        // Success codes
        register(
            &mut registry,
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "Continue processing",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "I010",
                "Configuration",
                Severity::Low,
                true,
                false,
                "Runtime configuration loaded",
                "Continue processing",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "I020",
                "Dump",
                Severity::Low,
                true,
                false,
                "Token dump loaded into a chain",
                "Continue to pattern matching",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "I030",
                "List",
                Severity::Low,
                true,
                false,
                "Chain invariants verified",
                "Continue processing",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "I040",
                "Pattern",
                Severity::Low,
                true,
                false,
                "Pattern scan over chain completed",
                "Continue processing",
            ),
        );
        register(
            &mut registry,
            ErrorMetadata::new(
                "I050",
                "Render",
                Severity::Low,
                true,
                false,
                "Chain rendered",
                "Continue processing",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_metadata() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::FILE_TOO_LARGE,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_CONFIG,
            dump::INVALID_LINE_MARKER,
            dump::INVALID_VARID,
            dump::UNKNOWN_FILE,
            dump::TOO_MANY_TOKENS,
            dump::UNBALANCED_BRACKET,
            dump::NESTING_TOO_DEEP,
            token::MALFORMED_STRING_LITERAL,
            list::BROKEN_CHAIN,
            list::TAIL_MISMATCH,
            list::ASYMMETRIC_LINK,
            list::STALE_HANDLE,
            list::HEAD_MISMATCH,
            list::SELF_LINK,
            pattern::VARID_ZERO,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::CONFIG_LOADED,
            success::DUMP_LOADED,
            success::LIST_VALIDATED,
            success::MATCH_SCAN_COMPLETE,
            success::RENDER_COMPLETE,
        ];

        for code in declared {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_varid_zero_is_recoverable() {
        assert!(is_recoverable(pattern::VARID_ZERO.as_str()));
        assert!(!requires_halt(pattern::VARID_ZERO.as_str()));
        assert_eq!(get_category(pattern::VARID_ZERO.as_str()), "Pattern");
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
    }

    #[test]
    fn test_nesting_limit_has_own_code() {
        assert_ne!(dump::NESTING_TOO_DEEP, dump::TOO_MANY_TOKENS);
        assert_eq!(get_category(dump::NESTING_TOO_DEEP.as_str()), "Dump");
        assert_eq!(get_severity(dump::NESTING_TOO_DEEP.as_str()).as_str(), "High");
    }
}
