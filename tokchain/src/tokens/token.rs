//! Token values
//!
//! A [`Token`] is the data half of a chain node: lexeme, classification flags
//! and provenance. Navigation (`next`, `previous`, `link`) is owned by the
//! [`TokenList`](super::TokenList) so a token value can be copied freely.

use crate::logging::codes::{self, Code};
use thiserror::Error;

/// Types that `is_standard_type` recognizes
pub const STANDARD_TYPES: [&str; 8] = [
    "bool", "char", "short", "int", "long", "float", "double", "size_t",
];

/// Errors raised by token value operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed string literal: {text}")]
    MalformedStringLiteral { text: String },
}

impl TokenError {
    pub fn malformed(text: &str) -> Self {
        Self::MalformedStringLiteral {
            text: text.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::MalformedStringLiteral { .. } => codes::token::MALFORMED_STRING_LITERAL,
        }
    }
}

pub type TokenResult<T> = Result<T, TokenError>;

/// A single lexical unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    is_name: bool,
    is_number: bool,
    is_boolean: bool,
    is_unsigned: bool,
    is_signed: bool,
    is_long: bool,
    is_unused: bool,
    var_id: u32,
    file_index: u32,
    line_number: u32,
    progress_value: u32,
}

impl Token {
    /// Create a token from non-empty text
    pub fn new(text: impl Into<String>) -> Self {
        let mut token = Self {
            text: String::new(),
            is_name: false,
            is_number: false,
            is_boolean: false,
            is_unsigned: false,
            is_signed: false,
            is_long: false,
            is_unused: false,
            var_id: 0,
            file_index: 0,
            line_number: 0,
            progress_value: 0,
        };
        token.set_text(text);
        token
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the lexeme. Reclassifies the token and clears its variable id.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        assert!(!text.is_empty(), "token text must not be empty");

        let bytes = text.as_bytes();
        self.is_name = bytes[0] == b'_' || bytes[0].is_ascii_alphabetic();
        self.is_number = bytes[0].is_ascii_digit()
            || (bytes.len() > 1 && bytes[0] == b'-' && bytes[1].is_ascii_digit());
        self.is_boolean = text == "true" || text == "false";
        self.var_id = 0;
        self.text = text;
    }

    pub fn is_name(&self) -> bool {
        self.is_name
    }

    pub fn is_number(&self) -> bool {
        self.is_number
    }

    pub fn is_boolean(&self) -> bool {
        self.is_boolean
    }

    pub fn is_unsigned(&self) -> bool {
        self.is_unsigned
    }

    pub fn set_unsigned(&mut self, value: bool) {
        self.is_unsigned = value;
    }

    pub fn is_signed(&self) -> bool {
        self.is_signed
    }

    pub fn set_signed(&mut self, value: bool) {
        self.is_signed = value;
    }

    pub fn is_long(&self) -> bool {
        self.is_long
    }

    pub fn set_long(&mut self, value: bool) {
        self.is_long = value;
    }

    pub fn is_unused(&self) -> bool {
        self.is_unused
    }

    pub fn set_unused(&mut self, value: bool) {
        self.is_unused = value;
    }

    pub fn var_id(&self) -> u32 {
        self.var_id
    }

    pub fn set_var_id(&mut self, var_id: u32) {
        self.var_id = var_id;
    }

    pub fn file_index(&self) -> u32 {
        self.file_index
    }

    pub fn set_file_index(&mut self, file_index: u32) {
        self.file_index = file_index;
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    pub fn set_line_number(&mut self, line_number: u32) {
        self.line_number = line_number;
    }

    pub fn progress_value(&self) -> u32 {
        self.progress_value
    }

    pub fn set_progress_value(&mut self, progress_value: u32) {
        self.progress_value = progress_value;
    }

    /// True for `"..."` tokens
    pub fn is_string_literal(&self) -> bool {
        is_quoted(&self.text)
    }

    /// Content of a string literal without the surrounding quotes
    pub fn string_literal_value(&self) -> TokenResult<&str> {
        if !is_quoted(&self.text) {
            return Err(TokenError::malformed(&self.text));
        }
        Ok(&self.text[1..self.text.len() - 1])
    }

    /// Merge `other` into this literal: `"ab"` + `"cd"` becomes `"abcd"`.
    ///
    /// Classification flags and the variable id are left as they are; a quoted
    /// literal is never a name, number or boolean.
    pub fn concatenate_string_literal(&mut self, other: &str) -> TokenResult<()> {
        if !is_quoted(&self.text) {
            return Err(TokenError::malformed(&self.text));
        }
        if !is_quoted(other) {
            return Err(TokenError::malformed(other));
        }

        self.text.pop();
        self.text.push_str(&other[1..]);
        Ok(())
    }

    /// Number of characters in the literal's value. An escape sequence counts
    /// once and `\0` terminates the string.
    pub fn string_length(&self) -> TokenResult<usize> {
        let mut chars = self.string_literal_value()?.chars();
        let mut len = 0;

        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some('0') => break,
                    Some(_) => {}
                    None => {
                        len += 1;
                        break;
                    }
                }
            }
            len += 1;
        }

        Ok(len)
    }

    pub fn is_standard_type(&self) -> bool {
        STANDARD_TYPES.contains(&self.text.as_str())
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}
