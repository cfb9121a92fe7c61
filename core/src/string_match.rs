//! `MatchType`: Config-level choice between exact and regex matching
//!
//! A criterion declares one match type that applies to all of its patterns: its
//! span names and its attribute-value patterns.
//!
//! Under `regexp`, span-name patterns must match the whole name
//! ([`MatchType::to_input_matcher`]) while an attribute-value pattern only needs
//! to occur somewhere in the value ([`MatchType::to_value_matcher`]).

use crate::{
    ConfigError, ExactMatcher, InputMatcher, RegexMatcher, MAX_PATTERN_LENGTH,
    MAX_REGEX_PATTERN_LENGTH,
};
use serde::Deserialize;
use std::fmt;

/// How the patterns of a criterion are matched.
///
/// Config spelling: `strict` → [`Exact`](Self::Exact), `regexp` → [`Regex`](Self::Regex).
///
/// # Example
///
/// ```
/// use attrproc::{InputMatcher, MatchType};
///
/// let matcher = MatchType::Regex.to_input_matcher(&["svc.*".to_string()]).unwrap();
/// assert!(matcher.matches("svcA"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MatchType {
    /// Exact string-set membership.
    #[serde(rename = "strict")]
    Exact,
    /// Regular-expression match (Rust `regex` crate syntax).
    #[serde(rename = "regexp")]
    Regex,
}

impl MatchType {
    /// Compile a list of span-name patterns into a runtime [`InputMatcher`].
    ///
    /// Regex patterns are anchored: they must match the whole candidate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PatternTooLong`] if a pattern exceeds the limit for
    /// this match type, or [`ConfigError::InvalidPattern`] if a regex does not compile.
    pub fn to_input_matcher(
        &self,
        patterns: &[String],
    ) -> Result<Box<dyn InputMatcher>, ConfigError> {
        self.compile(patterns, |p| RegexMatcher::new(p))
    }

    /// Compile an attribute-value pattern into a runtime [`InputMatcher`].
    ///
    /// Exact patterns behave as in [`to_input_matcher`](Self::to_input_matcher);
    /// a regex matches if it occurs anywhere in the value.
    ///
    /// # Errors
    ///
    /// Same as [`to_input_matcher`](Self::to_input_matcher).
    pub fn to_value_matcher(&self, pattern: &str) -> Result<Box<dyn InputMatcher>, ConfigError> {
        self.compile(&[pattern.to_owned()], |p| RegexMatcher::search(p))
    }

    fn compile(
        &self,
        patterns: &[String],
        build_regex: impl Fn(&[String]) -> Result<RegexMatcher, (String, regex::Error)>,
    ) -> Result<Box<dyn InputMatcher>, ConfigError> {
        let max = match self {
            Self::Exact => MAX_PATTERN_LENGTH,
            Self::Regex => MAX_REGEX_PATTERN_LENGTH,
        };
        if let Some(p) = patterns.iter().find(|p| p.len() > max) {
            return Err(ConfigError::PatternTooLong { len: p.len(), max });
        }

        match self {
            Self::Exact => Ok(Box::new(ExactMatcher::new(patterns.iter().cloned()))),
            Self::Regex => build_regex(patterns)
                .map(|m| Box::new(m) as Box<dyn InputMatcher>)
                .map_err(|(pattern, e)| ConfigError::InvalidPattern {
                    pattern,
                    reason: e.to_string(),
                }),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("strict"),
            Self::Regex => f.write_str("regexp"),
        }
    }
}
