//! `Action`: One attribute mutation step
//!
//! Actions are a sum type: each kind carries only the fields it uses, so a
//! `Delete` with a value, or an `Insert` with both a literal and a source key,
//! cannot be represented. The raw config is checked against these shapes in
//! [`validate`](crate::validate).

use crate::{AttributeValue, Attributes};
use sha2::{Digest, Sha256};

/// Where an insert or update takes its new value from.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    /// A fixed value from the config.
    Literal(AttributeValue),
    /// The current value of another attribute on the same span.
    FromAttribute(String),
}

impl ValueSource {
    /// Resolve the value against the span's current attributes.
    ///
    /// Returns `None` when the source attribute is absent.
    fn resolve(&self, attributes: &Attributes) -> Option<AttributeValue> {
        match self {
            Self::Literal(v) => Some(v.clone()),
            Self::FromAttribute(key) => attributes.get(key).cloned(),
        }
    }
}

/// One mutation applied to a span's attribute map.
///
/// | kind | precondition | effect |
/// |------|--------------|--------|
/// | `Insert` | key absent | set from source; never overwrites |
/// | `Update` | key present | overwrite from source |
/// | `Delete` | none | remove key if present |
/// | `Hash` | key present | replace with SHA-256 hex of the textual value |
///
/// Every unmet precondition (including an absent source attribute) is a no-op.
/// No action touches any key but its own.
///
/// # Example
///
/// ```
/// use attrproc::{Action, AttributeValue, Span, ValueSource};
///
/// let mut span = Span::new("svc").with("testKey", "testValue");
/// Action::Insert {
///     key: "testKey".into(),
///     source: ValueSource::Literal("testNewValue".into()),
/// }
/// .apply(&mut span.attributes);
///
/// // insert never overwrites
/// assert_eq!(span.get("testKey"), Some(&AttributeValue::from("testValue")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add the key if absent.
    Insert {
        /// Target attribute key.
        key: String,
        /// Where the value comes from.
        source: ValueSource,
    },
    /// Overwrite the key if present.
    Update {
        /// Target attribute key.
        key: String,
        /// Where the value comes from.
        source: ValueSource,
    },
    /// Remove the key.
    Delete {
        /// Target attribute key.
        key: String,
    },
    /// Replace the value with a one-way digest.
    Hash {
        /// Target attribute key.
        key: String,
    },
}

impl Action {
    /// The attribute key this action targets.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Insert { key, .. }
            | Self::Update { key, .. }
            | Self::Delete { key }
            | Self::Hash { key } => key,
        }
    }

    /// Config spelling of the action kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Hash { .. } => "hash",
        }
    }

    /// Apply this action to an attribute map.
    ///
    /// Returns `true` if the map was changed.
    pub fn apply(&self, attributes: &mut Attributes) -> bool {
        match self {
            Self::Insert { key, source } => {
                if attributes.contains_key(key) {
                    return false;
                }
                match source.resolve(attributes) {
                    Some(value) => {
                        attributes.insert(key.clone(), value);
                        true
                    }
                    None => false,
                }
            }
            Self::Update { key, source } => {
                if !attributes.contains_key(key) {
                    return false;
                }
                match source.resolve(attributes) {
                    Some(value) => {
                        attributes.insert(key.clone(), value);
                        true
                    }
                    None => false,
                }
            }
            Self::Delete { key } => attributes.shift_remove(key).is_some(),
            Self::Hash { key } => match attributes.get_mut(key) {
                Some(value) => {
                    let hashed = digest(&value.as_text());
                    *value = AttributeValue::String(hashed);
                    true
                }
                None => false,
            },
        }
    }
}

/// Lowercase hex SHA-256 of the input.
fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
