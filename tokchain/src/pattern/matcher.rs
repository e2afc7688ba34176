//! Pattern matching over the token chain
//!
//! A pattern is a space separated list of elements, each tested against one
//! token:
//!
//! | element        | matches                                            |
//! |----------------|----------------------------------------------------|
//! | `%var%`        | a name                                             |
//! | `%type%`       | a name without variable id that is not `delete`    |
//! | `%any%`        | any token                                          |
//! | `%varid%`      | a token whose variable id is the requested one     |
//! | `%num%`        | a number                                           |
//! | `%bool%`       | `true` or `false`                                  |
//! | `%str%`        | a string literal                                   |
//! | `%or%`         | `\|`                                               |
//! | `%oror%`       | `\|\|`                                             |
//! | `[abc]`        | a one character token listed between the brackets  |
//! | `a\|b\|c`      | one of the alternatives; an empty one may be skipped |
//! | `!!else`       | anything but `else`, or nothing at all             |
//! | other          | exactly that text                                  |

use super::compare::{char_in_first_word, first_word, first_word_len, multi_compare, MultiCompare};
use crate::diagnostics::ErrorMessage;
use crate::logging::codes;
use crate::tokens::{TokenId, TokenList};

/// Message reported when `%varid%` is matched without a variable id
pub const VARID_ZERO_MESSAGE: &str = "Internal error. TokenList::matches called with varid 0.";

impl TokenList {
    /// Test `pattern` against the chain starting at `tok`.
    ///
    /// `var_id` is the identity `%varid%` elements require. Matching
    /// `%varid%` with `var_id == 0` is a usage error: it is reported once per
    /// call through the list's reporter and the match fails.
    pub fn matches(&self, tok: Option<TokenId>, pattern: &str, var_id: u32) -> bool {
        if self.report_varid_misuse(pattern, var_id) {
            return false;
        }
        self.match_elements(tok, pattern, var_id)
    }

    /// Literal-only matching: every element must equal the text of the
    /// corresponding token.
    pub fn simple_match(&self, tok: Option<TokenId>, pattern: &str) -> bool {
        if pattern.is_empty() {
            return true;
        }

        let pattern = pattern.strip_suffix(' ').unwrap_or(pattern);
        let mut tok = tok;

        for segment in pattern.split(' ') {
            let Some(id) = tok else {
                return false;
            };
            let text = self[id].text();
            if segment.len() != text.len() || segment != text {
                return false;
            }
            tok = self.next(id);
        }

        true
    }

    /// First token from `start` (inclusive) up to `end` (exclusive) where
    /// `pattern` matches
    pub fn find_match(
        &self,
        start: Option<TokenId>,
        pattern: &str,
        end: Option<TokenId>,
        var_id: u32,
    ) -> Option<TokenId> {
        if self.report_varid_misuse(pattern, var_id) {
            return None;
        }

        let mut current = start;
        while let Some(id) = current {
            if Some(id) == end {
                return None;
            }
            if self.match_elements(Some(id), pattern, var_id) {
                return Some(id);
            }
            current = self.next(id);
        }
        None
    }

    /// A pattern containing `%varid%` can never match with `var_id == 0`
    fn report_varid_misuse(&self, pattern: &str, var_id: u32) -> bool {
        if var_id != 0 || !pattern.split(' ').any(|element| element == "%varid%") {
            return false;
        }

        self.report_error(
            &ErrorMessage::internal(VARID_ZERO_MESSAGE).with_code(codes::pattern::VARID_ZERO),
        );
        true
    }

    fn match_elements(&self, mut tok: Option<TokenId>, pattern: &str, var_id: u32) -> bool {
        let bytes = pattern.as_bytes();
        let mut p = 0;
        let mut first_element = true;

        while p < bytes.len() {
            while bytes.get(p) == Some(&b' ') {
                p += 1;
            }
            if p >= bytes.len() {
                return true;
            }

            let rest = &pattern[p..];
            let word = first_word(rest);
            let negation = rest.starts_with("!!") && rest.len() > 2;

            let Some(id) = tok else {
                // Out of tokens: only "not followed by" elements can hold
                if negation {
                    p += word.len();
                    continue;
                }
                return false;
            };

            // At the very start of the chain leading "!!" elements are satisfied
            if first_element && negation && self.previous(id).is_none() && self.next(id).is_some()
            {
                p += word.len();
                continue;
            }
            first_element = false;

            let token = &self[id];
            let text = token.text();

            if word.starts_with('%') {
                let matched = match word {
                    "%var%" => token.is_name(),
                    "%type%" => token.is_name() && token.var_id() == 0 && text != "delete",
                    "%any%" => true,
                    "%varid%" => token.var_id() == var_id,
                    "%num%" => token.is_number(),
                    "%bool%" => token.is_boolean(),
                    "%str%" => text.starts_with('"'),
                    "%or%" => text == "|",
                    "%oror%" => text == "||",
                    _ => word == text,
                };
                if !matched {
                    return false;
                }
            } else if word.starts_with('[')
                && text.len() == 1
                && char_in_first_word(word, ']').is_some()
            {
                if !bracket_set_contains(word, text.as_bytes()[0]) {
                    return false;
                }
            } else if char_in_first_word(word, '|').is_some()
                && (!word.starts_with('|') || first_word_len(word) > 2)
            {
                match multi_compare(rest, text) {
                    MultiCompare::Match => {}
                    MultiCompare::NoMatch => return false,
                    MultiCompare::EmptyAlternative => {
                        // Zero width: the next element sees the same token
                        p += word.len();
                        continue;
                    }
                }
            } else if negation {
                if &word[2..] == text {
                    return false;
                }
            } else if word != text {
                return false;
            }

            p += word.len();
            tok = self.next(id);
        }

        true
    }
}

/// Whether the one byte token `c` is in the set `[...]`. A `]` belongs to the
/// set when the element holds at least two of them, as in `[]]` or `[x]]`.
fn bracket_set_contains(word: &str, c: u8) -> bool {
    let mut closing = 0;

    for &b in &word.as_bytes()[1..] {
        if b == b']' {
            closing += 1;
            continue;
        }
        if b == c {
            return true;
        }
    }

    closing > 1 && c == b']'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemoryReporter, INTERNAL_ERROR_ID};
    use crate::tokens::test_support::chain;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_type_var_semicolon() {
        let (list, ids) = chain(&["int", "x", ";"]);
        assert!(list.matches(Some(ids[0]), "%type% %var% ;", 1));

        let (list, ids) = chain(&["int", "5", ";"]);
        assert!(!list.matches(Some(ids[0]), "%type% %var% ;", 1));
    }

    #[test]
    fn test_type_rejects_variables_and_delete() {
        let (mut list, ids) = chain(&["x", "delete"]);
        list[ids[0]].set_var_id(3);

        assert!(!list.matches(Some(ids[0]), "%type%", 1));
        assert!(list.matches(Some(ids[0]), "%var%", 1));
        assert!(!list.matches(Some(ids[1]), "%type%", 1));
    }

    #[test]
    fn test_keyword_elements() {
        let (list, ids) = chain(&["42", "true", "\"s\"", "|", "||", "?"]);
        let at = |i: usize| Some(ids[i]);

        assert!(list.matches(at(0), "%num%", 1));
        assert!(!list.matches(at(1), "%num%", 1));
        assert!(list.matches(at(1), "%bool%", 1));
        assert!(list.matches(at(2), "%str%", 1));
        assert!(list.matches(at(3), "%or%", 1));
        assert!(!list.matches(at(4), "%or%", 1));
        assert!(list.matches(at(4), "%oror%", 1));
        assert!(list.matches(at(5), "%any%", 1));
        assert!(list.matches(at(0), "%num% %bool% %str% %or% %oror% %any%", 1));
    }

    #[test]
    fn test_unknown_percent_element_is_literal() {
        let (list, ids) = chain(&["%", "x"]);

        assert!(list.matches(Some(ids[0]), "% x", 1));
        assert!(!list.matches(Some(ids[1]), "%", 1));
        assert!(!list.matches(Some(ids[1]), "%= x", 1));
    }

    #[test]
    fn test_varid_element() {
        let (mut list, ids) = chain(&["x", "=", "y"]);
        list[ids[0]].set_var_id(5);

        assert!(list.matches(Some(ids[0]), "%varid% =", 5));
        assert!(!list.matches(Some(ids[0]), "%varid% =", 6));
    }

    #[test]
    fn test_varid_zero_reports_once_and_fails() {
        let reporter = Arc::new(MemoryReporter::new());
        let (mut list, ids) = chain(&["x"]);
        list.set_reporter(reporter.clone());

        assert!(!list.matches(Some(ids[0]), "%varid%", 0));
        assert_eq!(reporter.count(), 1);

        // Would match literally, still fails and still reports exactly once
        assert!(!list.matches(Some(ids[0]), "x %varid% %varid%", 0));
        assert_eq!(reporter.count(), 2);

        let message = &reporter.messages()[0];
        assert_eq!(message.id, INTERNAL_ERROR_ID);
        assert_eq!(message.short_message, VARID_ZERO_MESSAGE);
        assert_eq!(message.code, codes::pattern::VARID_ZERO);
        assert!(message.call_stack.is_empty());
    }

    #[test]
    fn test_varid_zero_without_varid_element_is_silent() {
        let reporter = Arc::new(MemoryReporter::new());
        let (mut list, ids) = chain(&["x"]);
        list.set_reporter(reporter.clone());

        assert!(list.matches(Some(ids[0]), "%var%", 0));
        assert_eq!(reporter.count(), 0);
    }

    #[test]
    fn test_negation() {
        let (list, ids) = chain(&["if", "(", "x", ")", "else"]);

        assert!(!list.matches(Some(ids[3]), ") !!else", 1));
        assert!(list.matches(Some(ids[2]), "x ) !!{", 1));
        assert!(list.matches(Some(ids[1]), "!!else", 1));
        assert!(!list.matches(Some(ids[4]), "!!else", 1));
    }

    #[test]
    fn test_negation_at_end_of_chain() {
        let (list, ids) = chain(&["a", "b"]);

        assert!(list.matches(Some(ids[1]), "b !!else", 1));
        assert!(list.matches(Some(ids[1]), "b !!else !!;", 1));
        assert!(list.matches(None, "!!else", 1));
        assert!(!list.matches(Some(ids[1]), "b !!else c", 1));
    }

    #[test]
    fn test_leading_negation_skipped_at_chain_start() {
        let (list, ids) = chain(&["else", "x"]);

        // First node with a successor: "!!else" is not tested against "else"
        assert!(list.matches(Some(ids[0]), "!!else else x", 1));
        // Only the leading run is skipped
        assert!(!list.matches(Some(ids[0]), "else !!x", 1));
    }

    #[test]
    fn test_running_out_of_tokens_fails() {
        let (list, ids) = chain(&["a"]);

        assert!(!list.matches(Some(ids[0]), "a b", 1));
        assert!(!list.matches(None, "a", 1));
        assert!(list.matches(None, "", 1));
        assert!(list.matches(Some(ids[0]), "   ", 1));
    }

    #[test]
    fn test_bracket_set() {
        let (list, ids) = chain(&["x", "y", "z", "xy", "]"]);

        assert!(list.matches(Some(ids[0]), "[xy]", 1));
        assert!(list.matches(Some(ids[1]), "[xy]", 1));
        assert!(!list.matches(Some(ids[2]), "[xy]", 1));
        assert!(!list.matches(Some(ids[3]), "[xy]", 1));
        assert!(!list.matches(Some(ids[4]), "[xy]", 1));
        assert!(list.matches(Some(ids[4]), "[xy]]", 1));
        assert!(list.matches(Some(ids[4]), "[]]", 1));
    }

    #[test]
    fn test_lone_bracket_is_literal() {
        let (list, ids) = chain(&["[", "]"]);

        assert!(list.matches(Some(ids[0]), "[ ]", 1));
        assert!(list.matches(Some(ids[0]), "[ [xyz]]", 1));
    }

    #[test]
    fn test_alternatives() {
        let (list, ids) = chain(&["unsigned", "long", "x"]);

        assert!(list.matches(Some(ids[0]), "signed|unsigned long|int %var%", 1));
        assert!(!list.matches(Some(ids[0]), "signed|short", 1));
    }

    #[test]
    fn test_empty_alternative_is_zero_width() {
        let (list, ids) = chain(&["int", "x", ";"]);

        assert!(list.matches(Some(ids[0]), "const| int %var% ;", 1));
        assert!(list.matches(Some(ids[0]), "int *| %var% ;", 1));
        assert!(list.matches(Some(ids[0]), "int |*| x", 1));
        assert!(!list.matches(Some(ids[0]), "int const|volatile x", 1));
    }

    #[test]
    fn test_pipe_literals() {
        let (list, ids) = chain(&["|", "||", "|="]);

        assert!(list.matches(Some(ids[0]), "| || |=", 1));
        assert!(list.matches(Some(ids[1]), "|||&& |=", 1));
    }

    #[test]
    fn test_simple_match() {
        let (list, ids) = chain(&["return", "x", ";"]);

        assert!(list.simple_match(Some(ids[0]), "return x ;"));
        assert!(list.simple_match(Some(ids[0]), "return x"));
        assert!(list.simple_match(Some(ids[0]), "return x "));
        assert!(list.simple_match(Some(ids[0]), ""));
        assert!(!list.simple_match(Some(ids[0]), "return  x"));
        assert!(!list.simple_match(Some(ids[0]), "return x ; y"));
        assert!(!list.simple_match(Some(ids[0]), "ret"));
        assert!(!list.simple_match(None, "return"));
    }

    #[test]
    fn test_simple_match_treats_operators_literally() {
        let (list, ids) = chain(&["%var%"]);

        assert!(list.simple_match(Some(ids[0]), "%var%"));
        assert!(!list.simple_match(Some(ids[0]), "%any%"));
    }

    #[test]
    fn test_find_match() {
        let (list, ids) = chain(&["a", "=", "1", ";", "b", "=", "2", ";"]);

        assert_eq!(list.find_match(list.front(), "%var% =", None, 1), Some(ids[0]));
        assert_eq!(list.find_match(Some(ids[1]), "%var% =", None, 1), Some(ids[4]));
        assert_eq!(list.find_match(Some(ids[1]), "%var% =", Some(ids[4]), 1), None);
        assert_eq!(list.find_match(list.front(), "while", None, 1), None);
    }

    #[test]
    fn test_find_match_varid_zero_reports_once() {
        let reporter = Arc::new(MemoryReporter::new());
        let (mut list, _) = chain(&["a", "b", "c"]);
        list.set_reporter(reporter.clone());

        assert_eq!(list.find_match(list.front(), "%varid%", None, 0), None);
        assert_eq!(reporter.count(), 1);
    }

    proptest! {
        #[test]
        fn test_bracket_set_membership(set in "[a-z+*&=<>!-]{1,6}", c in "[a-z+*&=<>!-]") {
            let (list, ids) = chain(&[c.as_str(), "tail"]);
            let pattern = format!("[{}]", set);

            prop_assert_eq!(list.matches(Some(ids[0]), &pattern, 1), set.contains(c.as_str()));
        }

        #[test]
        fn test_doubled_bracket_admits_closing(set in "[a-z+*&=<>!-]{1,6}") {
            let (list, ids) = chain(&["]"]);
            let single = format!("[{}]", set);
            let doubled = format!("[{}]]", set);

            prop_assert!(!list.matches(Some(ids[0]), &single, 1));
            prop_assert!(list.matches(Some(ids[0]), &doubled, 1));
        }
    }
}
