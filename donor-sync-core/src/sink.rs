//! Common capability implemented by every publishing sink, so the
//! orchestrator can iterate over an arbitrary list of configured sinks.

use async_trait::async_trait;

use crate::analyze::LedgerSummary;

/// What a single sink did with the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Delivered; the detail is sink-specific (retrieval URL, cell count,
    /// commit description).
    Published { detail: String },
    /// Deliberate no-op, not an error (e.g. no auth token configured, no
    /// staged changes).
    Skipped { reason: String },
    /// The sink failed; the pipeline logs it and continues.
    Failed { reason: String },
}

/// A sink delivers a computed summary to exactly one external system.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Delivers the summary. Failures are folded into the outcome instead
    /// of propagating, so one sink can never abort the run.
    async fn publish(&self, summary: &LedgerSummary) -> SinkOutcome;
}
