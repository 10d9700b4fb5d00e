//! Regex-described identifiers

use regex::Regex;

use super::{Identifier, IdentityStore};

/// Accepts any identifier matching a regular expression, unchanged.
#[derive(Debug, Clone)]
pub struct PatternIdentityStore {
    pattern: Regex,
}

impl PatternIdentityStore {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl IdentityStore for PatternIdentityStore {
    fn parse(&self, raw: &str) -> Option<Identifier> {
        if !raw.is_empty() && self.pattern.is_match(raw) {
            Some(Identifier::new(raw))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matching() {
        let store = PatternIdentityStore::new(r"^[uc][0-9]+$").unwrap();
        assert_eq!(store.parse("u1").unwrap().as_str(), "u1");
        assert_eq!(store.parse("c42").unwrap().as_str(), "c42");
        assert!(store.parse("not-an-id").is_none());
        assert!(store.parse("x1").is_none());
    }

    #[test]
    fn test_empty_input_rejected_even_if_pattern_allows_it() {
        let store = PatternIdentityStore::new(r".*").unwrap();
        assert!(store.parse("").is_none());
        assert!(store.parse("anything").is_some());
    }

    #[test]
    fn test_invalid_regex() {
        assert!(PatternIdentityStore::new("(unclosed").is_err());
    }
}
