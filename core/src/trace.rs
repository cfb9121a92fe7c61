//! Evaluation trace types for debugging scope decisions.
//!
//! Trace types mirror [`Predicate`](crate::Predicate) and
//! [`ScopeRule`](crate::ScopeRule) but capture results instead of inputs. Use
//! [`ScopeRule::evaluate_with_trace`](crate::ScopeRule::evaluate_with_trace) (or
//! [`AttributeProcessor::explain`](crate::AttributeProcessor::explain)) to see why
//! a span was or was not processed.
//!
//! # Example
//!
//! ```ignore
//! let trace = processor.explain(&span);
//! println!("in scope: {}", trace.in_scope);
//! ```

use serde::Serialize;

/// Trace of a predicate evaluation.
///
/// In `And`, ALL children are evaluated (no short-circuit) for maximum debugging
/// value. The `matched` result is still correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredicateTrace {
    /// A single predicate evaluation.
    Single {
        /// Whether this predicate matched.
        matched: bool,
        /// Debug description of the `DataInput` (e.g. `AttributeInput { key: "testKey" }`).
        input: String,
        /// The extracted candidate, or `None` if the input found nothing.
        data: Option<String>,
        /// Debug description of the `InputMatcher`.
        matcher: String,
    },
    /// AND: all children must match.
    And {
        /// Whether all children matched.
        matched: bool,
        /// Trace of each child.
        children: Vec<PredicateTrace>,
    },
}

impl PredicateTrace {
    /// Get the overall match result of this predicate.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Single { matched, .. } | Self::And { matched, .. } => *matched,
        }
    }
}

/// Trace of a full scope decision for one span.
///
/// # INV: `in_scope` == `ScopeRule::in_scope()` result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeTrace {
    /// The span name the decision was made for.
    pub span: String,
    /// Include criterion trace, if an include rule is configured.
    pub include: Option<PredicateTrace>,
    /// Exclude criterion trace, if an exclude rule is configured.
    pub exclude: Option<PredicateTrace>,
    /// Final decision: include satisfied (or absent) and exclude not satisfied (or absent).
    pub in_scope: bool,
}
