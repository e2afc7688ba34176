//! Human readable chain rendering
//!
//! ```text
//!
//! ### title ###
//!
//!
//! ##file main.c
//! 1: int x@1 ;
//! 2:
//! 3: x@1 = 0 ;
//! ```
//!
//! Each file switch starts a `##file` header. Line markers are emitted for
//! every line up to the token's line, and a file's line position is
//! remembered when the chain leaves it and comes back.

use crate::config::runtime::RenderPreferences;
use crate::log_success;
use crate::logging::{self, codes, LogEvent, LogLevel};
use crate::tokens::{TokenId, TokenList};
use std::collections::HashMap;
use std::fmt::Write;

impl TokenList {
    /// Render the chain from `start` to the tail.
    ///
    /// Files are named from `file_names` when the index is in range and by
    /// number otherwise.
    pub fn render(
        &self,
        start: Option<TokenId>,
        show_var_id: bool,
        title: Option<&str>,
        file_names: Option<&[String]>,
    ) -> String {
        let mut out = String::new();

        if let Some(title) = title {
            let _ = write!(out, "\n### {} ###\n", title);
        }

        let mut line_number = 0u32;
        let mut current_file: Option<u32> = None;
        let mut remembered_lines: HashMap<u32, u32> = HashMap::new();

        let mut current = start;
        while let Some(id) = current {
            let token = &self[id];
            let file_index = token.file_index();

            let file_change = current_file != Some(file_index);
            if file_change {
                if let Some(previous_file) = current_file {
                    remembered_lines.insert(previous_file, line_number);
                }
                current_file = Some(file_index);

                out.push_str("\n\n##file ");
                match file_names.and_then(|names| names.get(file_index as usize)) {
                    Some(name) => out.push_str(name),
                    None => {
                        let _ = write!(out, "{}", file_index);
                    }
                }

                line_number = remembered_lines.get(&file_index).copied().unwrap_or(0);
            }

            if line_number != token.line_number() || file_change {
                while line_number < token.line_number() {
                    line_number += 1;
                    let _ = write!(out, "\n{}:", line_number);
                }
                line_number = token.line_number();
            }

            out.push(' ');
            out.push_str(token.text());
            if show_var_id && token.var_id() > 0 {
                let _ = write!(out, "@{}", token.var_id());
            }

            current = self.next(id);
        }

        out.push('\n');
        out
    }

    /// Render the whole chain with the given preferences
    pub fn render_with(&self, preferences: &RenderPreferences, file_names: Option<&[String]>) -> String {
        self.render(
            self.front(),
            preferences.show_var_id,
            preferences.title.as_deref(),
            file_names,
        )
    }

    /// Debug event holding the full rendering of the chain
    pub fn render_event(&self, title: Option<&str>, file_names: Option<&[String]>) -> LogEvent {
        LogEvent::debug_block(self.render(self.front(), true, title, file_names))
            .with_context("tokens", &self.len().to_string())
    }

    /// Write the rendering of the whole chain to the debug log
    pub fn print_out(&self, title: Option<&str>, file_names: Option<&[String]>) {
        if logging::config::get_min_log_level() < LogLevel::Debug {
            return;
        }

        logging::dispatch(self.render_event(title, file_names));
        log_success!(codes::success::RENDER_COMPLETE, "Chain rendered",
            "tokens" => self.len()
        );
    }
}
