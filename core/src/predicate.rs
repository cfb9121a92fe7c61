//! Predicate: Boolean expressions over spans
//!
//! Predicates combine a [`DataInput`] with an [`InputMatcher`] and compose the
//! results with AND. A match criterion compiles to `And([name, attr...])`;
//! [`ScopeRule`](crate::ScopeRule) combines two criteria as `include AND NOT exclude`.

use crate::{DataInput, InputMatcher, PredicateTrace, Span};
use std::fmt::Debug;

/// A single predicate: combines a [`DataInput`] with an [`InputMatcher`].
///
/// # INV: None → false
///
/// If the `DataInput` yields nothing (e.g. the attribute is absent), the predicate
/// evaluates to `false` without consulting the matcher.
///
/// # Example
///
/// ```
/// use attrproc::{AttributeInput, RegexMatcher, SinglePredicate, Span};
///
/// let predicate = SinglePredicate::new(
///     Box::new(AttributeInput::new("testKey")),
///     Box::new(RegexMatcher::search(["Value.*"]).unwrap()),
/// );
/// assert!(predicate.evaluate(&Span::new("svcA").with("testKey", "testValue1")));
/// assert!(!predicate.evaluate(&Span::new("svcA").with("testKey", "testV1")));
/// assert!(!predicate.evaluate(&Span::new("svcA")));
/// ```
pub struct SinglePredicate {
    input: Box<dyn DataInput>,
    matcher: Box<dyn InputMatcher>,
}

impl SinglePredicate {
    /// Create a new single predicate from a `DataInput` and `InputMatcher`.
    #[must_use]
    pub fn new(input: Box<dyn DataInput>, matcher: Box<dyn InputMatcher>) -> Self {
        Self { input, matcher }
    }

    /// Get a reference to the input.
    #[must_use]
    pub fn input(&self) -> &dyn DataInput {
        &*self.input
    }

    /// Get a reference to the matcher.
    #[must_use]
    pub fn matcher(&self) -> &dyn InputMatcher {
        &*self.matcher
    }

    /// Evaluate this predicate against the given span.
    pub fn evaluate(&self, span: &Span) -> bool {
        match self.input.get(span) {
            None => false, // INV: None → false
            Some(candidate) => self.matcher.matches(&candidate),
        }
    }

    /// Evaluate with full trace for debugging.
    #[must_use]
    pub fn evaluate_with_trace(&self, span: &Span) -> PredicateTrace {
        let data = self.input.get(span);
        let matched = data.as_deref().is_some_and(|c| self.matcher.matches(c));
        PredicateTrace::Single {
            matched,
            input: format!("{:?}", self.input),
            data: data.map(|c| c.into_owned()),
            matcher: format!("{:?}", self.matcher),
        }
    }
}

impl Debug for SinglePredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinglePredicate")
            .field("input", &self.input)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// Composite predicate with boolean logic.
///
/// # Variants
///
/// - `Single`: A single predicate
/// - `And`: All predicates must match (short-circuit on first false)
pub enum Predicate {
    /// A single predicate.
    Single(SinglePredicate),

    /// All predicates must match (logical AND).
    /// Short-circuits on the first `false`.
    And(Vec<Predicate>),
}

impl Predicate {
    /// Evaluate this predicate against the given span.
    pub fn evaluate(&self, span: &Span) -> bool {
        match self {
            Predicate::Single(p) => p.evaluate(span),
            Predicate::And(predicates) => predicates.iter().all(|p| p.evaluate(span)),
        }
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`evaluate()`](Self::evaluate), this does NOT short-circuit `And`,
    /// so every condition shows up in the trace. The `matched` result is still correct.
    #[must_use]
    pub fn evaluate_with_trace(&self, span: &Span) -> PredicateTrace {
        match self {
            Self::Single(p) => p.evaluate_with_trace(span),
            Self::And(predicates) => {
                let children: Vec<PredicateTrace> = predicates
                    .iter()
                    .map(|p| p.evaluate_with_trace(span))
                    .collect();
                let matched = children.iter().all(PredicateTrace::matched);
                PredicateTrace::And { matched, children }
            }
        }
    }

    /// Compose predicates with AND semantics, unwrapping the single-child case.
    ///
    /// Returns `None` for an empty list: an empty conjunction has no meaning in a
    /// match criterion and is rejected by validation instead.
    #[must_use]
    pub fn from_all(mut predicates: Vec<Self>) -> Option<Self> {
        match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(Self::And(predicates)),
        }
    }
}

impl Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Single(p) => f.debug_tuple("Single").field(p).finish(),
            Predicate::And(ps) => f.debug_tuple("And").field(ps).finish(),
        }
    }
}
