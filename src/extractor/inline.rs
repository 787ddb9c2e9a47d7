//! Line-based lookup of inline trailing documentation.
//!
//! ```python
//! def add(a: int,      # first
//!         b: int = 0,  # second
//!         ) -> int:    # sum
//! ```
//!
//! The comment on a parameter's line documents that parameter; the comment on the
//! line holding `->` documents the return value.

use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

/// Source split into lines for inline comment lookup.
pub struct InlineDocs<'s> {
    lines: Vec<&'s str>,
    /// Whole-word patterns, built once per looked-up name
    patterns: RefCell<HashMap<String, Regex>>,
}

impl<'s> InlineDocs<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            lines: source.lines().collect(),
            patterns: RefCell::new(HashMap::new()),
        }
    }

    /// Trailing comment for `name` on 1-indexed `line`.
    ///
    /// The code part of the line must mention `name` as a whole word. Returns an empty
    /// string when the line has no comment, does not mention the name, or is out of range.
    pub fn lookup(&self, line: usize, name: &str) -> String {
        let mut patterns = self.patterns.borrow_mut();
        if !patterns.contains_key(name) {
            match Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
                Ok(re) => {
                    patterns.insert(name.to_string(), re);
                }
                Err(_) => return String::new(),
            }
        }
        let Some(pattern) = patterns.get(name) else {
            return String::new();
        };
        self.comment_after(line, |code| pattern.is_match(code))
    }

    /// Trailing comment on the line holding the `->` return marker.
    pub fn lookup_return(&self, line: usize) -> String {
        self.comment_after(line, |code| code.contains("->"))
    }

    fn comment_after(&self, line: usize, mentions: impl Fn(&str) -> bool) -> String {
        let Some(text) = line.checked_sub(1).and_then(|idx| self.lines.get(idx)) else {
            return String::new();
        };
        let Some(hash) = comment_start(text) else {
            return String::new();
        };
        if !mentions(&text[..hash]) {
            return String::new();
        }
        text[hash + 1..].trim().to_string()
    }
}

/// Byte offset of the `#` starting a comment, ignoring `#` inside string literals.
pub fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'#' => return Some(i),
                b'"' | b'\'' => quote = Some(b),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "def add(a: int,  # first\n        b: int = 0,  # second\n        ) -> int:  # sum\n    return a + b\n";

    #[test]
    fn test_lookup_parameter_docs() {
        let docs = InlineDocs::new(SOURCE);
        assert_eq!(docs.lookup(1, "a"), "first");
        assert_eq!(docs.lookup(2, "b"), "second");
    }

    #[test]
    fn test_lookup_requires_word_boundary() {
        let docs = InlineDocs::new("    ab: int  # not a\n");
        assert_eq!(docs.lookup(1, "a"), "");
        assert_eq!(docs.lookup(1, "ab"), "not a");
    }

    #[test]
    fn test_lookup_missing_comment_or_line() {
        let docs = InlineDocs::new(SOURCE);
        assert_eq!(docs.lookup(4, "a"), "");
        assert_eq!(docs.lookup(0, "a"), "");
        assert_eq!(docs.lookup(99, "a"), "");
    }

    #[test]
    fn test_lookup_return() {
        let docs = InlineDocs::new(SOURCE);
        assert_eq!(docs.lookup_return(3), "sum");
        assert_eq!(docs.lookup_return(1), "");
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        let docs = InlineDocs::new("    sep: str = \"#\",  # separator\n");
        assert_eq!(docs.lookup(1, "sep"), "separator");
        assert_eq!(comment_start("x = 'a#b'"), None);
    }

    #[test]
    fn test_pattern_built_once_per_name() {
        let docs = InlineDocs::new(SOURCE);
        assert_eq!(docs.lookup(1, "a"), "first");
        assert_eq!(docs.lookup(2, "a"), "");
        assert_eq!(docs.lookup(2, "b"), "second");
        assert_eq!(docs.patterns.borrow().len(), 2);
    }
}
