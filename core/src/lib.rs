//! attrproc - Span attribute processor
//!
//! The processing stage of a telemetry pipeline: given a batch of spans and a
//! declarative configuration, it decides which spans are in scope and applies
//! an ordered list of attribute mutations to each in-scope span, then forwards
//! the whole batch to a downstream exporter.
//!
//! # Architecture
//!
//! - [`AttributeValue`] / [`Span`]: the data being processed
//! - [`InputMatcher`]: pattern matching against a textual candidate (exact set or regex)
//! - [`DataInput`]: extracts a candidate from a span (its name, or one attribute)
//! - [`SinglePredicate`] / [`Predicate`]: `DataInput` + `InputMatcher`, composed with And
//! - [`ScopeRule`]: include AND NOT exclude
//! - [`Action`]: one attribute mutation (insert, update, delete, hash)
//! - [`validate`]: raw [`ProcessorConfig`] → immutable [`ValidatedConfig`]
//! - [`AttributeProcessor`]: the façade: scope + actions per span, then export
//!
//! # Key invariants
//!
//! 1. **Validation is eager.** Every pattern is compiled and every action is checked
//!    in [`validate`]. An [`AttributeProcessor`] can only be built from a
//!    [`ValidatedConfig`], so an invalid config never reaches a batch.
//!
//! 2. **Missing data → false.** When a [`DataInput`] finds nothing (the attribute is
//!    absent), the predicate evaluates to `false`.
//!
//! 3. **Actions run in declared order.** Each action sees the attribute map left by
//!    its predecessors.
//!
//! 4. **Spans are never dropped.** Out-of-scope spans pass through untouched and
//!    batch order is preserved.
//!
//! # Example
//!
//! ```
//! use attrproc::prelude::*;
//!
//! let config = ProcessorConfig::from_yaml(r#"
//! type: attribute
//! name: redact
//! include:
//!   matchType: strict
//!   spanNames: ["svcA"]
//! actions:
//!   - key: password
//!     action: update
//!     value: redacted
//! "#).unwrap();
//!
//! let processor = AttributeProcessor::new(validate(config).unwrap(), NoopExporter);
//! let batch = processor.process(vec![
//!     Span::new("svcA").with("password", "hunter2"),
//!     Span::new("svcB").with("password", "hunter2"),
//! ]);
//!
//! assert_eq!(batch[0].get("password"), Some(&AttributeValue::from("redacted")));
//! assert_eq!(batch[1].get("password"), Some(&AttributeValue::from("hunter2")));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod action;
mod attribute;
mod config;
mod data_input;
mod exporter;
mod input_matcher;
mod predicate;
mod processor;
mod scope;
mod span;
mod string_match;
mod trace;
mod validate;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Data model
pub use attribute::{AttributeValue, Attributes};
pub use span::Span;

// Matching
pub use data_input::{AttributeInput, DataInput, SpanNameInput};
pub use input_matcher::{ExactMatcher, InputMatcher, PresenceMatcher, RegexMatcher};
pub use predicate::{Predicate, SinglePredicate};
pub use scope::ScopeRule;
pub use string_match::MatchType;

// Actions
pub use action::{Action, ValueSource};

// Config and validation
pub use config::{
    ActionConfig, ActionKind, AttributeConditionConfig, MatchCriterionConfig, ProcessorConfig,
    ProcessorType,
};
pub use validate::{validate, ValidatedConfig};

// Processing
pub use exporter::{ExportResult, NoopExporter, SpanExporter};
pub use processor::AttributeProcessor;

// Trace types
pub use trace::{PredicateTrace, ScopeTrace};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use attrproc::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Actions
        Action,
        // Data model
        AttributeInput,
        AttributeProcessor,
        AttributeValue,
        Attributes,
        // Errors
        ConfigError,
        DataInput,
        ExactMatcher,
        ExportResult,
        InputMatcher,
        MatchType,
        NoopExporter,
        Predicate,
        PredicateTrace,
        PresenceMatcher,
        // Config types
        ProcessorConfig,
        RegexMatcher,
        ScopeRule,
        ScopeTrace,
        SinglePredicate,
        Span,
        SpanExporter,
        SpanNameInput,
        ValidatedConfig,
        ValueSource,
        // Validation
        validate,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length for `strict` (exact) match patterns.
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for `regexp` patterns.
///
/// Shorter than [`MAX_PATTERN_LENGTH`] because regex compilation cost grows
/// faster than literal comparison.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from processor configuration and validation.
///
/// These are raised when the processor is constructed, never while a batch is
/// processed. Fix the configuration and rebuild the processor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The processor has no actions.
    #[error("processor \"{processor}\" has no actions; at least one action is required")]
    NoActions {
        /// Name of the processor.
        processor: String,
    },

    /// An insert or update action has neither `value` nor `fromAttribute`.
    #[error("action #{index} ({kind} \"{key}\") needs exactly one of `value` or `fromAttribute`, got neither")]
    MissingValue {
        /// Position of the action in the list.
        index: usize,
        /// The action's key.
        key: String,
        /// The action kind.
        kind: &'static str,
    },

    /// An insert or update action has both `value` and `fromAttribute`.
    #[error("action #{index} ({kind} \"{key}\") needs exactly one of `value` or `fromAttribute`, got both")]
    ConflictingValue {
        /// Position of the action in the list.
        index: usize,
        /// The action's key.
        key: String,
        /// The action kind.
        kind: &'static str,
    },

    /// A delete or hash action carries `value` or `fromAttribute`.
    #[error("action #{index} ({kind} \"{key}\") does not accept `value` or `fromAttribute`")]
    UnexpectedValue {
        /// Position of the action in the list.
        index: usize,
        /// The action's key.
        key: String,
        /// The action kind.
        kind: &'static str,
    },

    /// An action or attribute condition has an empty key.
    #[error("empty key in {location}")]
    EmptyKey {
        /// Where the empty key was found (e.g. `"action #0"`, `"include attribute #1"`).
        location: String,
    },

    /// An include or exclude criterion has neither span names nor attributes.
    #[error("{polarity} criterion matches nothing; specify `spanNames` or `attributes`")]
    EmptyCriterion {
        /// `"include"` or `"exclude"`.
        polarity: &'static str,
    },

    /// A regex pattern failed to compile.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// A pattern exceeds the maximum allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The configuration document could not be parsed.
    #[error("invalid config: {reason}")]
    Parse {
        /// The underlying parser message.
        reason: String,
    },
}
