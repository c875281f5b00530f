//! @ai:module:intent Ordered first-match-wins regex cascades
//! @ai:module:layer domain
//! @ai:module:public_api PatternCascade
//! @ai:module:stateless true

use regex::Regex;

/// @ai:intent Ordered list of (pattern, extractor) rules evaluated first-match-wins
///
/// A rule succeeds when its pattern matches and the extractor accepts the first
/// capture group. A rule whose extractor rejects the capture falls through to
/// the next rule.
pub struct PatternCascade<T> {
    rules: Vec<(Regex, fn(&str) -> Option<T>)>,
}

impl<T> PatternCascade<T> {
    /// @ai:intent Compile patterns sharing one extractor, in priority order
    /// @ai:pre every pattern is a valid regex with one capture group
    /// @ai:effects pure
    pub fn new(patterns: &[&str], extract: fn(&str) -> Option<T>) -> Self {
        let rules = patterns
            .iter()
            .map(|p| (Regex::new(p).expect("Invalid regex"), extract))
            .collect();
        Self { rules }
    }

    /// @ai:intent Run the rules in order and return the first extracted value
    /// @ai:effects pure
    pub fn first_match(&self, text: &str) -> Option<T> {
        self.find(text).map(|(_, value)| value)
    }

    /// @ai:intent Like `first_match`, also returning the index of the winning rule
    /// @ai:effects pure
    pub fn find(&self, text: &str) -> Option<(usize, T)> {
        self.rules.iter().enumerate().find_map(|(i, (re, extract))| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| extract(m.as_str()))
                .map(|value| (i, value))
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
