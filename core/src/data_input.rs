//! `DataInput`: Extracts the candidate string from a span
//!
//! A `DataInput` is the span-specific half of a predicate; the
//! [`InputMatcher`](crate::InputMatcher) is the pattern half. The input returns
//! `None` when there is nothing to match (the attribute is absent), and the
//! predicate then evaluates to `false`.

use crate::Span;
use std::borrow::Cow;
use std::fmt::Debug;

/// Extracts a textual candidate from a [`Span`].
///
/// # Example
///
/// ```
/// use attrproc::{AttributeInput, DataInput, Span, SpanNameInput};
///
/// let span = Span::new("svcA").with("retries", 3);
/// assert_eq!(SpanNameInput.get(&span).as_deref(), Some("svcA"));
/// assert_eq!(AttributeInput::new("retries").get(&span).as_deref(), Some("3"));
/// assert_eq!(AttributeInput::new("missing").get(&span), None);
/// ```
pub trait DataInput: Send + Sync + Debug {
    /// Extract the candidate, or `None` if the span has nothing to offer.
    fn get<'a>(&self, span: &'a Span) -> Option<Cow<'a, str>>;
}

/// Extracts the span name. Never returns `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanNameInput;

impl DataInput for SpanNameInput {
    fn get<'a>(&self, span: &'a Span) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(span.name.as_str()))
    }
}

/// Extracts one attribute's value in textual form.
#[derive(Debug, Clone)]
pub struct AttributeInput {
    key: String,
}

impl AttributeInput {
    /// Create an input for the given attribute key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The attribute key being extracted.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl DataInput for AttributeInput {
    fn get<'a>(&self, span: &'a Span) -> Option<Cow<'a, str>> {
        span.get(&self.key).map(crate::AttributeValue::as_text)
    }
}
