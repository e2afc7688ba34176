//! Token pattern language
//!
//! [`TokenList::matches`](crate::tokens::TokenList::matches) runs the full
//! pattern language, [`TokenList::simple_match`](crate::tokens::TokenList::simple_match)
//! compares plain literals, and [`multi_compare`] tests `a|b|...` alternatives
//! on their own.

pub mod compare;
pub mod matcher;

pub use compare::{
    char_in_first_word, first_word, first_word_equals, first_word_len, multi_compare, MultiCompare,
};
pub use matcher::VARID_ZERO_MESSAGE;
