//! # tokchain
//!
//! Mutable token chain and pattern matcher for pattern based static analysis.
//!
//! A source file arrives as a [`TokenList`], a doubly-linked chain of
//! [`Token`]s with symmetric bracket links. Checks walk the chain, locate
//! positions with the compact pattern language ([`TokenList::matches`],
//! [`TokenList::simple_match`], [`TokenList::find_match`]) and rewrite the
//! stream in place with the editing primitives.
//!
//! ```
//! use tokchain::dump::{read_dump, DumpOptions};
//!
//! let list = read_dump("1: if ( x@1 == 0 ) { }", None, &DumpOptions::default()).unwrap();
//! let head = list.front();
//!
//! assert!(list.matches(head, "if ( %var% ==|!= 0 )", 0));
//! assert!(list.matches(head, "if ( %varid% ==", 1));
//! assert!(list.simple_match(head, "if ("));
//! ```

// Internal modules
pub mod config;
pub mod diagnostics;
pub mod dump;
#[macro_use]
pub mod logging;
pub mod pattern;
pub mod render;
pub mod tokens;

// Re-export key types for library consumers
pub use diagnostics::{ErrorMessage, ErrorReporter, FileLocation, LoggingReporter, MemoryReporter};
pub use dump::{read_dump, read_dump_file, DumpError, DumpOptions};
pub use pattern::{multi_compare, MultiCompare};
pub use tokens::{ListError, Token, TokenError, TokenId, TokenList};
