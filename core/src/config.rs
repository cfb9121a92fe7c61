//! Raw configuration types, as loaded from YAML or JSON.
//!
//! These types mirror the runtime types but carry every field as written by the
//! operator, including combinations that are invalid. [`validate`](crate::validate)
//! turns them into a [`ValidatedConfig`](crate::ValidatedConfig).
//!
//! | Config type | Runtime type |
//! |-------------|--------------|
//! | [`ProcessorConfig`] | [`ValidatedConfig`](crate::ValidatedConfig) |
//! | [`MatchCriterionConfig`] | [`Predicate`](crate::Predicate) |
//! | [`AttributeConditionConfig`] | [`SinglePredicate`](crate::SinglePredicate) |
//! | [`ActionConfig`] | [`Action`](crate::Action) |
//!
//! ```yaml
//! type: attribute
//! name: redact-passwords
//! include:
//!   matchType: regexp
//!   spanNames: ["svc.*"]
//!   attributes:
//!     - key: password
//! actions:
//!   - key: password
//!     action: hash
//! ```

use crate::{AttributeValue, ConfigError, MatchType};
use serde::Deserialize;

/// Processor kind. Only attribute processors exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorType {
    /// Mutates span attributes.
    #[default]
    Attribute,
}

/// A processor entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Processor kind (`attribute`).
    #[serde(rename = "type", default)]
    pub processor_type: ProcessorType,

    /// Processor name, used in logs and error messages.
    #[serde(default)]
    pub name: String,

    /// Spans must satisfy this criterion to be processed.
    #[serde(default)]
    pub include: Option<MatchCriterionConfig>,

    /// Spans satisfying this criterion are never processed.
    #[serde(default)]
    pub exclude: Option<MatchCriterionConfig>,

    /// Ordered attribute mutations.
    #[serde(default)]
    pub actions: Vec<ActionConfig>,
}

/// An include or exclude criterion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchCriterionConfig {
    /// How `span_names` and attribute `value`s are matched.
    pub match_type: MatchType,

    /// Span name patterns (OR).
    #[serde(default)]
    pub span_names: Vec<String>,

    /// Attribute conditions (AND).
    #[serde(default)]
    pub attributes: Vec<AttributeConditionConfig>,
}

/// One attribute condition: the key must be present, and its value must match
/// `value` when given.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConditionConfig {
    /// Attribute key (exact, case-sensitive).
    pub key: String,

    /// Value pattern, matched under the criterion's match type.
    #[serde(default)]
    pub value: Option<String>,
}

/// Action kind as written in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Add when absent.
    Insert,
    /// Overwrite when present.
    Update,
    /// Remove.
    Delete,
    /// Replace with digest.
    Hash,
}

impl ActionKind {
    /// Config spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Hash => "hash",
        }
    }
}

/// One action entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActionConfig {
    /// Target attribute key.
    pub key: String,

    /// What to do.
    pub action: ActionKind,

    /// Literal value (insert/update).
    #[serde(default)]
    pub value: Option<AttributeValue>,

    /// Copy the value from this attribute (insert/update).
    #[serde(default)]
    pub from_attribute: Option<String>,
}

impl ProcessorConfig {
    /// Parse a processor config from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed YAML or an unknown field/value.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Parse a processor config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or an unknown field/value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }
}
