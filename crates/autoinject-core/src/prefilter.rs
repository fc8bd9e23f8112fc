//! Textual candidate prefilter.
//!
//! One alternation of every configured keypath, each escaped. A file whose
//! text never mentions a keypath cannot contain a reference to it, so it is
//! passed through without being parsed. False positives (a keypath inside a
//! string or comment) are fine; the walker finds nothing to inject.

use regex::Regex;

/// Combined keypath pattern, built once per configuration.
#[derive(Debug, Clone)]
pub struct Prefilter {
    pattern: Option<Regex>,
}

impl Prefilter {
    /// `None` pattern (no keypaths) rejects every text.
    pub fn new<'k>(keypaths: impl IntoIterator<Item = &'k str>) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = keypaths.into_iter().map(regex::escape).collect();
        if alternatives.is_empty() {
            return Ok(Prefilter { pattern: None });
        }

        let pattern = Regex::new(&format!("(?:{})", alternatives.join("|")))?;
        Ok(Prefilter {
            pattern: Some(pattern),
        })
    }

    /// True when `text` contains at least one keypath.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text))
    }

    pub fn as_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }
}
