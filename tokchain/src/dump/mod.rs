//! Token dump reader
//!
//! Reads the text produced by [`TokenList::render`] back into a chain. The
//! reader accepts:
//!
//! - `### title ###` banners and blank lines, which are skipped
//! - `##file NAME` headers, where `NAME` is looked up in the file name table
//!   and otherwise parsed as a file index
//! - `N:` line markers at the start of a line
//! - whitespace separated tokens with an optional `@varid` suffix
//!
//! Tokens seen before the first header belong to file 0, line 0. Returning
//! to a file resumes at the last line read for it, mirroring the renderer.

use crate::config::constants::compile_time::dump::{
    MAX_BRACKET_DEPTH, MAX_DUMP_FILE_SIZE, MAX_TOKEN_COUNT,
};
use crate::config::runtime::DumpPreferences;
use crate::logging::codes::{self, Code};
use crate::tokens::{ListError, TokenId, TokenList};
use crate::{log_debug, log_error, log_success, log_warning};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const FILE_HEADER: &str = "##file";

/// Token dump reader errors
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    Io { message: String },

    #[error("Line {line}: invalid line marker '{marker}'")]
    InvalidLineMarker { line: u32, marker: String },

    #[error("Line {line}: invalid variable id in token '{token}'")]
    InvalidVarId { line: u32, token: String },

    #[error("Line {line}: unknown file '{name}'")]
    UnknownFile { line: u32, name: String },

    #[error("Dump exceeds maximum token count: {max}")]
    TooManyTokens { max: usize },

    #[error("Line {line}: unbalanced bracket '{bracket}'")]
    UnbalancedBracket { line: u32, bracket: String },

    #[error("Line {line}: bracket nesting exceeds maximum depth: {max}")]
    NestingTooDeep { line: u32, max: usize },

    #[error("Loaded chain is inconsistent: {0}")]
    InvalidChain(#[from] ListError),
}

impl DumpError {
    pub fn error_code(&self) -> Code {
        match self {
            DumpError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            DumpError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            DumpError::InvalidEncoding { .. } => codes::file_processing::INVALID_ENCODING,
            DumpError::Io { .. } => codes::file_processing::IO_ERROR,
            DumpError::InvalidLineMarker { .. } => codes::dump::INVALID_LINE_MARKER,
            DumpError::InvalidVarId { .. } => codes::dump::INVALID_VARID,
            DumpError::UnknownFile { .. } => codes::dump::UNKNOWN_FILE,
            DumpError::TooManyTokens { .. } => codes::dump::TOO_MANY_TOKENS,
            DumpError::UnbalancedBracket { .. } => codes::dump::UNBALANCED_BRACKET,
            DumpError::NestingTooDeep { .. } => codes::dump::NESTING_TOO_DEEP,
            DumpError::InvalidChain(err) => err.error_code(),
        }
    }

    /// Dump line the error was found on, when it belongs to one
    pub fn line(&self) -> Option<u32> {
        match self {
            DumpError::InvalidLineMarker { line, .. }
            | DumpError::InvalidVarId { line, .. }
            | DumpError::UnknownFile { line, .. }
            | DumpError::UnbalancedBracket { line, .. }
            | DumpError::NestingTooDeep { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}

pub type DumpResult<T> = Result<T, DumpError>;

/// Reader switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Pair `()`, `[]` and `{}` with bracket links
    pub link_brackets: bool,
    /// Run `TokenList::validate` on the loaded chain
    pub validate_after_load: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            link_brackets: true,
            validate_after_load: true,
        }
    }
}

impl From<&DumpPreferences> for DumpOptions {
    fn from(prefs: &DumpPreferences) -> Self {
        Self {
            link_brackets: prefs.link_brackets,
            validate_after_load: prefs.validate_after_load,
        }
    }
}

/// Parse dump text into a new chain
pub fn read_dump(
    text: &str,
    file_names: Option<&[String]>,
    options: &DumpOptions,
) -> DumpResult<TokenList> {
    let mut reader = DumpReader::new(file_names, options);
    for (index, line) in text.lines().enumerate() {
        reader.read_line(index as u32 + 1, line)?;
    }
    let list = reader.finish()?;

    log_success!(codes::success::DUMP_LOADED, "Token dump loaded",
        "tokens" => list.len()
    );
    Ok(list)
}

/// Read and parse a dump file
pub fn read_dump_file<P: AsRef<Path>>(
    path: P,
    file_names: Option<&[String]>,
    options: &DumpOptions,
) -> DumpResult<TokenList> {
    let path = path.as_ref();
    let display = path.display().to_string();

    log_debug!("Reading token dump", "file" => display);

    let metadata = fs::metadata(path).map_err(|e| io_error(e, &display))?;
    if metadata.len() > MAX_DUMP_FILE_SIZE {
        let error = DumpError::FileTooLarge {
            size: metadata.len(),
            max_size: MAX_DUMP_FILE_SIZE,
        };
        log_error!(error.error_code(), "Dump file exceeds maximum size",
            "file" => display,
            "size" => metadata.len()
        );
        return Err(error);
    }

    let bytes = fs::read(path).map_err(|e| io_error(e, &display))?;
    let text = String::from_utf8(bytes).map_err(|_| {
        let error = DumpError::InvalidEncoding {
            path: display.clone(),
        };
        log_error!(error.error_code(), "Dump file is not valid UTF-8", "file" => display);
        error
    })?;

    read_dump(&text, file_names, options)
}

fn io_error(err: std::io::Error, path: &str) -> DumpError {
    let error = if err.kind() == std::io::ErrorKind::NotFound {
        DumpError::FileNotFound {
            path: path.to_string(),
        }
    } else {
        DumpError::Io {
            message: err.to_string(),
        }
    };
    log_error!(error.error_code(), "Cannot read dump file",
        "file" => path,
        "error" => err
    );
    error
}

struct DumpReader<'a> {
    list: TokenList,
    file_names: Option<&'a [String]>,
    options: DumpOptions,
    file: Option<u32>,
    line: u32,
    remembered_lines: HashMap<u32, u32>,
    open_brackets: Vec<(TokenId, u32)>,
}

impl<'a> DumpReader<'a> {
    fn new(file_names: Option<&'a [String]>, options: &DumpOptions) -> Self {
        Self {
            list: TokenList::new(),
            file_names,
            options: *options,
            file: None,
            line: 0,
            remembered_lines: HashMap::new(),
            open_brackets: Vec::new(),
        }
    }

    fn read_line(&mut self, dump_line: u32, text: &str) -> DumpResult<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with("###") {
            return Ok(());
        }

        let mut words = trimmed.split_whitespace().peekable();

        if words.peek() == Some(&FILE_HEADER) {
            words.next();
            let name = words.next().unwrap_or("");
            let file = self.resolve_file(dump_line, name)?;
            self.switch_file(file);
        } else if let Some(first) = words.peek() {
            if let Some(line) = parse_line_marker(dump_line, first)? {
                self.line = line;
                words.next();
            }
        }

        for word in words {
            self.push_word(dump_line, word)?;
        }
        Ok(())
    }

    fn resolve_file(&self, dump_line: u32, name: &str) -> DumpResult<u32> {
        let by_name = self
            .file_names
            .and_then(|names| names.iter().position(|n| n == name));

        match by_name {
            Some(index) => Ok(index as u32),
            None => name.parse().map_err(|_| DumpError::UnknownFile {
                line: dump_line,
                name: name.to_string(),
            }),
        }
    }

    fn switch_file(&mut self, file: u32) {
        if let Some(previous) = self.file {
            self.remembered_lines.insert(previous, self.line);
        }
        self.file = Some(file);
        self.line = self.remembered_lines.get(&file).copied().unwrap_or(0);
    }

    fn push_word(&mut self, dump_line: u32, word: &str) -> DumpResult<()> {
        if self.list.len() >= MAX_TOKEN_COUNT {
            return Err(DumpError::TooManyTokens {
                max: MAX_TOKEN_COUNT,
            });
        }

        let (text, var_id) = split_var_id(dump_line, word)?;
        let id = self
            .list
            .push_back(text, self.line, self.file.unwrap_or(0));
        self.list[id].set_var_id(var_id);

        if self.options.link_brackets {
            self.track_bracket(dump_line, id, text)?;
        }
        Ok(())
    }

    fn track_bracket(&mut self, dump_line: u32, id: TokenId, text: &str) -> DumpResult<()> {
        match text {
            "(" | "[" | "{" => {
                if self.open_brackets.len() >= MAX_BRACKET_DEPTH {
                    return Err(DumpError::NestingTooDeep {
                        line: dump_line,
                        max: MAX_BRACKET_DEPTH,
                    });
                }
                self.open_brackets.push((id, dump_line));
            }
            ")" | "]" | "}" => {
                let opener = match text {
                    ")" => "(",
                    "]" => "[",
                    _ => "{",
                };
                match self.open_brackets.pop() {
                    Some((open, _)) if self.list[open].text() == opener => {
                        self.list.create_mutual_links(open, id);
                    }
                    _ => {
                        return Err(DumpError::UnbalancedBracket {
                            line: dump_line,
                            bracket: text.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> DumpResult<TokenList> {
        if let Some(&(open, line)) = self.open_brackets.last() {
            return Err(DumpError::UnbalancedBracket {
                line,
                bracket: self.list[open].text().to_string(),
            });
        }

        if self.options.validate_after_load {
            self.list.validate()?;
            log_success!(codes::success::LIST_VALIDATED, "Loaded chain validated",
                "tokens" => self.list.len()
            );
        } else {
            log_warning!("Loaded chain not validated", "tokens" => self.list.len());
        }
        Ok(self.list)
    }
}

/// `Some(n)` for an `n:` marker, `None` when the word is an ordinary token
fn parse_line_marker(dump_line: u32, word: &str) -> DumpResult<Option<u32>> {
    let Some(digits) = word.strip_suffix(':') else {
        return Ok(None);
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    digits
        .parse()
        .map(Some)
        .map_err(|_| DumpError::InvalidLineMarker {
            line: dump_line,
            marker: word.to_string(),
        })
}

/// Split `text@varid`. Words without a numeric suffix keep var id 0.
fn split_var_id(dump_line: u32, word: &str) -> DumpResult<(&str, u32)> {
    let Some(at) = word.rfind('@') else {
        return Ok((word, 0));
    };
    let (text, suffix) = (&word[..at], &word[at + 1..]);
    if text.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Ok((word, 0));
    }

    let var_id = suffix.parse().map_err(|_| DumpError::InvalidVarId {
        line: dump_line,
        token: word.to_string(),
    })?;
    Ok((text, var_id))
}
