//! `AttributeValue`: the primitive value kinds a span attribute can carry
//!
//! Matching works on the *textual form* of a value (see [`AttributeValue::as_text`]),
//! so a `regexp` condition like `"12.*"` matches both the string `"123"` and the
//! integer `123`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A span's attribute map.
///
/// Keys are case-sensitive and compared byte-for-byte. Insertion order is kept so
/// a processed span serializes in a stable order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// A primitive attribute value.
///
/// # Serialization
///
/// Untagged: `"text"`, `42`, `4.2` and `true` deserialize to `String`, `Int`,
/// `Double` and `Bool` respectively. This is the same shape used for literal
/// `value`s in action configs.
///
/// # Example
///
/// ```
/// use attrproc::AttributeValue;
///
/// let v = AttributeValue::from(42);
/// assert_eq!(v.as_text(), "42");
/// assert_eq!(v.as_str(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer value.
    Int(i64),
    /// 64-bit floating-point value.
    Double(f64),
    /// String value.
    String(String),
}

impl AttributeValue {
    /// Returns the textual form of this value.
    ///
    /// Strings borrow. Booleans are `true`/`false` and integers are decimal.
    /// Floats use the shortest round-trip form, but a whole number keeps its
    /// `.0` (`2.0`, not `2`) and infinities read `Infinity`/`-Infinity`.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::String(s) => Cow::Borrowed(s.as_str()),
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::Double(d) => Cow::Owned(double_text(*d)),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn double_text(d: f64) -> String {
    if d.is_infinite() {
        let text = if d > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_owned()
    } else if d.fract() == 0.0 {
        format!("{d:.1}")
    } else {
        // NaN and fractional values
        d.to_string()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// From implementations
// ═══════════════════════════════════════════════════════════════════════════════

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
