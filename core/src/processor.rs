//! `AttributeProcessor`: the processing stage.
//!
//! Per batch: decide scope for every span, run the action list on the spans in
//! scope, forward the whole batch (same spans, same order) to the exporter.

use crate::{
    validate, ConfigError, ExportResult, ProcessorConfig, ScopeTrace, Span, SpanExporter,
    ValidatedConfig,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Applies a validated config to span batches and forwards them downstream.
///
/// The config is held behind an `Arc` and never changes after construction, so a
/// processor (given a `Send + Sync` exporter) can be shared across threads with
/// no locking.
///
/// # Example
///
/// ```
/// use attrproc::prelude::*;
///
/// let config = ProcessorConfig::from_yaml(r#"
/// name: hash-users
/// include:
///   matchType: regexp
///   spanNames: ["svc.*"]
/// actions:
///   - key: user.id
///     action: hash
/// "#).unwrap();
/// let processor = AttributeProcessor::from_config(config, NoopExporter).unwrap();
///
/// let mut span = Span::new("svcA").with("user.id", 42);
/// assert!(processor.process_span(&mut span));
/// assert_ne!(span.get("user.id"), Some(&AttributeValue::Int(42)));
///
/// let mut other = Span::new("serviceC").with("user.id", 42);
/// assert!(!processor.process_span(&mut other));
/// assert_eq!(other.get("user.id"), Some(&AttributeValue::Int(42)));
/// ```
#[derive(Debug)]
pub struct AttributeProcessor<E> {
    config: Arc<ValidatedConfig>,
    exporter: E,
}

impl<E: SpanExporter> AttributeProcessor<E> {
    /// Build a processor from an already-validated config.
    #[must_use]
    pub fn new(config: ValidatedConfig, exporter: E) -> Self {
        Self::with_shared(Arc::new(config), exporter)
    }

    /// Build a processor that shares its config with other processors.
    #[must_use]
    pub fn with_shared(config: Arc<ValidatedConfig>, exporter: E) -> Self {
        debug!(
            processor = config.name(),
            actions = config.actions().len(),
            include = config.scope().include().is_some(),
            exclude = config.scope().exclude().is_some(),
            "attribute processor ready"
        );
        Self { config, exporter }
    }

    /// Validate a raw config and build a processor from it.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] raised by [`validate`].
    pub fn from_config(config: ProcessorConfig, exporter: E) -> Result<Self, ConfigError> {
        Ok(Self::new(validate(config)?, exporter))
    }

    /// The validated config this processor runs.
    #[must_use]
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// The downstream exporter.
    #[must_use]
    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Run the action list on one span if it is in scope.
    ///
    /// Returns `true` if the span was in scope (whether or not any action
    /// changed it).
    pub fn process_span(&self, span: &mut Span) -> bool {
        let in_scope = self.config.scope().in_scope(span);
        trace!(processor = self.config.name(), span = %span.name, in_scope, "scope decided");
        if in_scope {
            for action in self.config.actions() {
                let changed = action.apply(&mut span.attributes);
                trace!(
                    span = %span.name,
                    action = action.kind(),
                    key = action.key(),
                    changed,
                    "action applied"
                );
            }
        }
        in_scope
    }

    /// Process every span in the batch and return it, order and length unchanged.
    #[must_use]
    pub fn process(&self, mut batch: Vec<Span>) -> Vec<Span> {
        let in_scope = batch
            .iter_mut()
            .map(|span| self.process_span(span))
            .filter(|&in_scope| in_scope)
            .count();
        debug!(
            processor = self.config.name(),
            spans = batch.len(),
            in_scope,
            "batch processed"
        );
        batch
    }

    /// Process the batch and forward it to the exporter.
    ///
    /// Returns the exporter's result unchanged. An empty batch is still
    /// forwarded.
    pub fn export(&self, batch: Vec<Span>) -> ExportResult {
        let batch = self.process(batch);
        let result = self.exporter.export(batch);
        if let ExportResult::Failure(reason) = &result {
            debug!(processor = self.config.name(), %reason, "export failed");
        }
        result
    }

    /// Explain the scope decision for one span without mutating it.
    #[must_use]
    pub fn explain(&self, span: &Span) -> ScopeTrace {
        self.config.scope().evaluate_with_trace(span)
    }
}
