//! `SpanExporter`: the downstream sink a processed batch is forwarded to.

use crate::Span;
use std::sync::Arc;

/// Outcome of one export call.
///
/// The processor returns whatever its exporter reports, unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportResult {
    /// The batch was accepted.
    Success,
    /// The batch was rejected; carries the exporter's reason.
    Failure(String),
}

impl ExportResult {
    /// Returns `true` for [`ExportResult::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A sink for processed spans.
///
/// Implementations must be `Send + Sync`: one processor may export batches
/// from several threads at once.
///
/// # Example
///
/// ```
/// use attrproc::{ExportResult, Span, SpanExporter};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct Counting(AtomicUsize);
///
/// impl SpanExporter for Counting {
///     fn export(&self, batch: Vec<Span>) -> ExportResult {
///         self.0.fetch_add(batch.len(), Ordering::Relaxed);
///         ExportResult::Success
///     }
/// }
///
/// let exporter = Counting::default();
/// assert!(exporter.export(vec![Span::new("a"), Span::new("b")]).is_success());
/// assert_eq!(exporter.0.load(Ordering::Relaxed), 2);
/// ```
pub trait SpanExporter: Send + Sync {
    /// Deliver a batch.
    fn export(&self, batch: Vec<Span>) -> ExportResult;
}

impl<E: SpanExporter + ?Sized> SpanExporter for Arc<E> {
    fn export(&self, batch: Vec<Span>) -> ExportResult {
        (**self).export(batch)
    }
}

impl<E: SpanExporter + ?Sized> SpanExporter for &E {
    fn export(&self, batch: Vec<Span>) -> ExportResult {
        (**self).export(batch)
    }
}

impl SpanExporter for Box<dyn SpanExporter> {
    fn export(&self, batch: Vec<Span>) -> ExportResult {
        (**self).export(batch)
    }
}

/// Accepts and discards every batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExporter;

impl SpanExporter for NoopExporter {
    fn export(&self, _batch: Vec<Span>) -> ExportResult {
        ExportResult::Success
    }
}
