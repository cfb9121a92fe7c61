//! `ScopeRule`: include/exclude polarity over two compiled criteria.

use crate::{Predicate, ScopeTrace, Span};

/// Decides whether a span is in scope for the action pipeline.
///
/// A span is in scope iff
/// (`include` absent OR span satisfies `include`) AND
/// (`exclude` absent OR span does NOT satisfy `exclude`).
///
/// With neither rule configured every span is in scope.
///
/// # Example
///
/// ```
/// use attrproc::{ExactMatcher, Predicate, ScopeRule, SinglePredicate, Span, SpanNameInput};
///
/// let exclude = Predicate::Single(SinglePredicate::new(
///     Box::new(SpanNameInput),
///     Box::new(ExactMatcher::new(["health"])),
/// ));
/// let scope = ScopeRule::new(None, Some(exclude));
///
/// assert!(scope.in_scope(&Span::new("checkout")));
/// assert!(!scope.in_scope(&Span::new("health")));
/// ```
#[derive(Debug, Default)]
pub struct ScopeRule {
    include: Option<Predicate>,
    exclude: Option<Predicate>,
}

impl ScopeRule {
    /// Create a scope rule from compiled include and exclude criteria.
    #[must_use]
    pub fn new(include: Option<Predicate>, exclude: Option<Predicate>) -> Self {
        Self { include, exclude }
    }

    /// The compiled include criterion, if any.
    #[must_use]
    pub fn include(&self) -> Option<&Predicate> {
        self.include.as_ref()
    }

    /// The compiled exclude criterion, if any.
    #[must_use]
    pub fn exclude(&self) -> Option<&Predicate> {
        self.exclude.as_ref()
    }

    /// Returns `true` if the span should be processed.
    pub fn in_scope(&self, span: &Span) -> bool {
        self.include.as_ref().map_or(true, |p| p.evaluate(span))
            && !self.exclude.as_ref().is_some_and(|p| p.evaluate(span))
    }

    /// Evaluate both criteria in full and report the decision.
    ///
    /// Both include and exclude are traced even when include already failed.
    #[must_use]
    pub fn evaluate_with_trace(&self, span: &Span) -> ScopeTrace {
        let include = self.include.as_ref().map(|p| p.evaluate_with_trace(span));
        let exclude = self.exclude.as_ref().map(|p| p.evaluate_with_trace(span));
        let in_scope = include.as_ref().map_or(true, |t| t.matched())
            && !exclude.as_ref().is_some_and(|t| t.matched());
        ScopeTrace {
            span: span.name.clone(),
            include,
            exclude,
            in_scope,
        }
    }
}
