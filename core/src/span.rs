//! `Span`: a telemetry record as seen by the processor.

use crate::{AttributeValue, Attributes};
use serde::{Deserialize, Serialize};

/// A single telemetry record: a name plus an attribute map.
///
/// The processor only ever reads `name` and reads/writes `attributes`. Any other
/// field (ids, timing, status) is carried in `other` and forwarded as-is.
///
/// # Example
///
/// ```
/// use attrproc::{AttributeValue, Span};
///
/// let span = Span::new("GET /users")
///     .with("http.method", "GET")
///     .with("http.status_code", 200);
///
/// assert_eq!(span.get("http.status_code"), Some(&AttributeValue::Int(200)));
/// assert_eq!(span.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The span name.
    pub name: String,

    /// The span's attributes.
    #[serde(default)]
    pub attributes: Attributes,

    /// Fields the processor never touches.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Span {
    /// Create a span with the given name and no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute (builder pattern). Last write wins.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}
