//! `InputMatcher`: Pattern matching against a textual candidate
//!
//! Matchers see only the candidate string (a span name, or an attribute value in
//! its textual form). They never see the span itself, so the same matcher type
//! serves name conditions and attribute-value conditions.
//!
//! # Available Matchers
//!
//! - [`ExactMatcher`]: membership in a set of strings (`strict`)
//! - [`RegexMatcher`]: any of a list of regexes (`regexp`), full match or search
//! - [`PresenceMatcher`]: matches anything (attribute condition without a value)

use indexmap::IndexSet;
use regex::Regex;
use std::fmt::Debug;

/// Matches a textual candidate.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: a compiled config is shared across
/// threads processing different batches.
///
/// # Example
///
/// ```
/// use attrproc::{ExactMatcher, InputMatcher};
///
/// let matcher = ExactMatcher::new(["svcA", "svcB"]);
/// assert!(matcher.matches("svcA"));
/// assert!(!matcher.matches("svcC"));
/// ```
pub trait InputMatcher: Send + Sync + Debug {
    /// Check if the candidate matches.
    fn matches(&self, candidate: &str) -> bool;
}

// Blanket implementation for boxed InputMatchers
impl InputMatcher for Box<dyn InputMatcher> {
    fn matches(&self, candidate: &str) -> bool {
        (**self).matches(candidate)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ExactMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Exact string-set membership.
///
/// Case-sensitive, byte-for-byte, no trimming.
///
/// ```
/// use attrproc::{ExactMatcher, InputMatcher};
///
/// let matcher = ExactMatcher::new(["hello"]);
/// assert!(matcher.matches("hello"));
/// assert!(!matcher.matches("Hello"));
/// assert!(!matcher.matches("hello "));
/// ```
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    expected: IndexSet<String>,
}

impl ExactMatcher {
    /// Create a new exact matcher over the given values.
    pub fn new<I, S>(expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expected: expected.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the accepted values, in declaration order.
    pub fn expected(&self) -> impl Iterator<Item = &str> {
        self.expected.iter().map(String::as_str)
    }
}

impl InputMatcher for ExactMatcher {
    fn matches(&self, candidate: &str) -> bool {
        self.expected.contains(candidate)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RegexMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Regex matcher with OR semantics across its patterns.
///
/// [`new`](Self::new) requires each pattern to match the whole candidate, so
/// `svc.*` matches `svcA` but not `serviceC` or `my-svcA`.
/// [`search`](Self::search) compiles the patterns as written and matches
/// anywhere in the candidate. Uses Rust's `regex` crate (linear time, no `ReDoS`).
///
/// ```
/// use attrproc::{InputMatcher, RegexMatcher};
///
/// let matcher = RegexMatcher::new(["svc.*", "test.*"]).unwrap();
/// assert!(matcher.matches("svcA"));
/// assert!(matcher.matches("testB"));
/// assert!(!matcher.matches("serviceC"));
///
/// let search = RegexMatcher::search(["Value.*"]).unwrap();
/// assert!(search.matches("testValue1"));
/// assert!(!search.matches("testV1"));
/// ```
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    patterns: Vec<Regex>,
}

impl RegexMatcher {
    /// Compile a full-match regex matcher from the given patterns.
    ///
    /// Each pattern must compile on its own before it is anchored; the anchored
    /// regex is built from the parsed pattern, so verbose-mode comments and
    /// unbalanced groups cannot leak into the anchors.
    ///
    /// # Errors
    ///
    /// Returns the failing pattern, as written, together with its compile error.
    pub fn new<I, S>(patterns: I) -> Result<Self, (String, regex::Error)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::compile(patterns, anchored)
    }

    /// Compile an unanchored regex matcher: a candidate matches if any pattern
    /// occurs somewhere in it.
    ///
    /// # Errors
    ///
    /// Returns the failing pattern together with its compile error.
    pub fn search<I, S>(patterns: I) -> Result<Self, (String, regex::Error)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::compile(patterns, Regex::new)
    }

    fn compile<I, S>(
        patterns: I,
        build: impl Fn(&str) -> Result<Regex, regex::Error>,
    ) -> Result<Self, (String, regex::Error)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                build(p).map_err(|e| (p.to_owned(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns the number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if no patterns were given (matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Compile `pattern` so that it must match the whole candidate.
///
/// The pattern is checked as written first. The anchored form wraps the
/// printed HIR, which has no comments and no unscoped flags, rather than the
/// raw text.
fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    let hir = regex_syntax::parse(pattern).map_err(|e| regex::Error::Syntax(e.to_string()))?;
    Regex::new(&format!("^(?:{hir})$"))
}

impl InputMatcher for RegexMatcher {
    fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(candidate))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PresenceMatcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches any candidate.
///
/// Paired with an [`AttributeInput`](crate::AttributeInput), this turns a predicate
/// into a pure presence check: the input yields nothing when the key is absent
/// (→ `false`), and anything it yields matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceMatcher;

impl InputMatcher for PresenceMatcher {
    fn matches(&self, _candidate: &str) -> bool {
        true
    }
}
