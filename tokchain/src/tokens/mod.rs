//! Token chain for pattern based analysis
//!
//! A [`TokenList`] holds the tokens of one translation unit as a doubly-linked
//! chain. Checks locate positions with the pattern matcher and rewrite the
//! stream in place with the editing primitives:
//!
//! - **[`Token`]**: lexeme, classification flags and provenance
//! - **[`TokenList`]**: arena of nodes threaded into a chain with a head and tail
//! - **[`TokenId`]**: generation-checked handle to a node
//! - **Bracket links**: symmetric pairing of matching delimiters
//!
//! Handles are only meaningful for the list that issued them. Using a handle
//! after its node was deleted panics.

pub mod edit;
pub mod links;
pub mod list;
pub mod token;

pub use list::{Iter, ListError, ListResult, TokenId, TokenList};
pub use token::{Token, TokenError, TokenResult, STANDARD_TYPES};
