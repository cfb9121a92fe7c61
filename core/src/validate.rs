//! Validation: raw [`ProcessorConfig`] → immutable [`ValidatedConfig`].
//!
//! Runs once, when the processor is built. Every pattern is compiled here and
//! every action is converted to its typed form, so nothing can fail while a
//! batch is being processed.

use crate::config::{ActionConfig, ActionKind, MatchCriterionConfig};
use crate::{
    Action, AttributeInput, ConfigError, Predicate, PresenceMatcher, ProcessorConfig, ScopeRule,
    SinglePredicate, SpanNameInput, ValueSource,
};

/// A processor config that passed validation.
///
/// Holds the compiled scope rule and the typed action list. There is no way to
/// build one except through [`validate`], and nothing in it can be changed
/// afterwards; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct ValidatedConfig {
    name: String,
    scope: ScopeRule,
    actions: Vec<Action>,
}

impl ValidatedConfig {
    /// The processor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled scope rule.
    #[must_use]
    pub fn scope(&self) -> &ScopeRule {
        &self.scope
    }

    /// The actions, in execution order. Never empty.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// Validate a raw config and compile it.
///
/// Checks, returning the first violation found:
/// - the action list is non-empty
/// - every action key is non-empty
/// - insert/update carry exactly one of `value` / `fromAttribute`
/// - delete/hash carry neither
/// - every include/exclude criterion has span names or attributes
/// - every attribute-condition key is non-empty
/// - every pattern is within length limits and, for `regexp`, compiles
///
/// # Errors
///
/// Returns the [`ConfigError`] describing the first violation.
///
/// # Example
///
/// ```
/// use attrproc::{validate, ConfigError, ProcessorConfig};
///
/// let config = ProcessorConfig::from_yaml(r#"
/// name: invalidRegex
/// include:
///   matchType: regexp
///   spanNames: ["***"]
/// actions:
///   - key: testKey
///     action: update
///     value: redacted
/// "#).unwrap();
///
/// assert!(matches!(validate(config), Err(ConfigError::InvalidPattern { .. })));
/// ```
pub fn validate(config: ProcessorConfig) -> Result<ValidatedConfig, ConfigError> {
    let ProcessorConfig {
        name,
        include,
        exclude,
        actions,
        ..
    } = config;

    if actions.is_empty() {
        return Err(ConfigError::NoActions { processor: name });
    }

    let actions = actions
        .into_iter()
        .enumerate()
        .map(|(index, action)| compile_action(index, action))
        .collect::<Result<Vec<_>, _>>()?;

    let include = include
        .map(|c| compile_criterion("include", c))
        .transpose()?;
    let exclude = exclude
        .map(|c| compile_criterion("exclude", c))
        .transpose()?;

    Ok(ValidatedConfig {
        name,
        scope: ScopeRule::new(include, exclude),
        actions,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Actions
// ═══════════════════════════════════════════════════════════════════════════════

fn compile_action(index: usize, config: ActionConfig) -> Result<Action, ConfigError> {
    let ActionConfig {
        key,
        action: kind,
        value,
        from_attribute,
    } = config;

    if key.is_empty() {
        return Err(ConfigError::EmptyKey {
            location: format!("action #{index}"),
        });
    }

    match kind {
        ActionKind::Insert | ActionKind::Update => {
            let source = match (value, from_attribute) {
                (Some(v), None) => ValueSource::Literal(v),
                (None, Some(from)) if from.is_empty() => {
                    return Err(ConfigError::EmptyKey {
                        location: format!("action #{index} fromAttribute"),
                    });
                }
                (None, Some(from)) => ValueSource::FromAttribute(from),
                (None, None) => {
                    return Err(ConfigError::MissingValue {
                        index,
                        key,
                        kind: kind.as_str(),
                    });
                }
                (Some(_), Some(_)) => {
                    return Err(ConfigError::ConflictingValue {
                        index,
                        key,
                        kind: kind.as_str(),
                    });
                }
            };
            Ok(if kind == ActionKind::Insert {
                Action::Insert { key, source }
            } else {
                Action::Update { key, source }
            })
        }
        ActionKind::Delete | ActionKind::Hash => {
            if value.is_some() || from_attribute.is_some() {
                return Err(ConfigError::UnexpectedValue {
                    index,
                    key,
                    kind: kind.as_str(),
                });
            }
            Ok(if kind == ActionKind::Delete {
                Action::Delete { key }
            } else {
                Action::Hash { key }
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Criteria
// ═══════════════════════════════════════════════════════════════════════════════

/// Compile a criterion to `And([name?, attr...])`.
fn compile_criterion(
    polarity: &'static str,
    config: MatchCriterionConfig,
) -> Result<Predicate, ConfigError> {
    let MatchCriterionConfig {
        match_type,
        span_names,
        attributes,
    } = config;

    let mut predicates = Vec::with_capacity(attributes.len() + 1);

    if !span_names.is_empty() {
        predicates.push(Predicate::Single(SinglePredicate::new(
            Box::new(SpanNameInput),
            match_type.to_input_matcher(&span_names)?,
        )));
    }

    for (i, condition) in attributes.into_iter().enumerate() {
        if condition.key.is_empty() {
            return Err(ConfigError::EmptyKey {
                location: format!("{polarity} attribute #{i}"),
            });
        }
        let matcher = match condition.value {
            Some(pattern) => match_type.to_value_matcher(&pattern)?,
            None => Box::new(PresenceMatcher),
        };
        predicates.push(Predicate::Single(SinglePredicate::new(
            Box::new(AttributeInput::new(condition.key)),
            matcher,
        )));
    }

    Predicate::from_all(predicates).ok_or(ConfigError::EmptyCriterion { polarity })
}
