//! Word scanning and alternative comparison
//!
//! A pattern is scanned in place. Each helper looks at the *first word* of a
//! slice, the bytes up to the first space or the end.

/// Outcome of comparing a token text against `a|b|...` alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiCompare {
    /// One alternative equals the text
    Match,
    /// No alternative equals the text
    NoMatch,
    /// Nothing matched, but an empty alternative is present
    EmptyAlternative,
}

#[inline]
fn byte_at(bytes: &[u8], i: usize) -> u8 {
    bytes.get(i).copied().unwrap_or(0)
}

/// Test `needle` against the `|`-separated alternatives at the start of
/// `haystack`. The alternatives end at the first space.
pub fn multi_compare(haystack: &str, needle: &str) -> MultiCompare {
    let hay = haystack.as_bytes();
    let pin = needle.as_bytes();

    let mut h = 0;
    let mut n = 0;
    let mut empty_found = false;

    loop {
        let hc = byte_at(hay, h);
        let nc = byte_at(pin, n);

        if nc == hc {
            if nc == 0 {
                return MultiCompare::Match;
            }
            n += 1;
            h += 1;
        } else if hc == b'|' {
            if nc == 0 {
                return MultiCompare::Match;
            }
            if n == 0 {
                empty_found = true;
            }
            n = 0;
            h += 1;
        } else if hc == b' ' || hc == 0 {
            if n == 0 {
                return MultiCompare::EmptyAlternative;
            }
            break;
        } else {
            // Skip the rest of this alternative
            n = 0;
            loop {
                h += 1;
                let c = byte_at(hay, h);
                if c == b' ' || c == b'|' || c == 0 {
                    break;
                }
            }

            let c = byte_at(hay, h);
            if c == b' ' || c == 0 {
                return if empty_found {
                    MultiCompare::EmptyAlternative
                } else {
                    MultiCompare::NoMatch
                };
            }
            h += 1;
        }
    }

    if byte_at(pin, n) == 0 {
        MultiCompare::Match
    } else if empty_found {
        MultiCompare::EmptyAlternative
    } else {
        MultiCompare::NoMatch
    }
}

/// Bytes of `s` up to the first space
pub fn first_word(s: &str) -> &str {
    match s.find(' ') {
        Some(end) => &s[..end],
        None => s,
    }
}

/// Whether the first word of `s` is exactly `word`
pub fn first_word_equals(s: &str, word: &str) -> bool {
    s.starts_with(word) && matches!(s.as_bytes().get(word.len()), None | Some(b' '))
}

/// Position of `c` within the first word of `s`
pub fn char_in_first_word(s: &str, c: char) -> Option<usize> {
    first_word(s).find(c)
}

pub fn first_word_len(s: &str) -> usize {
    first_word(s).len()
}
