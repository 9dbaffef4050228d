//! High-level pipeline: orchestrates read → combine → analyze → publish.
//!
//! Every stage reports its own status instead of relying on log output.
//! The run never aborts mid-way: a failed source degrades to an empty
//! aggregate and a failed sink is recorded while the remaining sinks still
//! run. That continue-on-failure behavior is a policy decision made here,
//! not a side effect of swallowed errors.

use tracing::{error, info};

use crate::aggregate::{DailyAggregate, LabeledAggregate};
use crate::analyze::{summarize, LedgerSummary};
use crate::combine::combine;
use crate::config::SourceSpec;
use crate::contract::SheetsApi;
use crate::sink::{Sink, SinkOutcome};
use crate::source::read_source;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Ok,
    Failed(String),
}

#[derive(Debug)]
pub struct SourceReport {
    pub label: String,
    pub status: StageStatus,
    /// Number of distinct dates this source contributed.
    pub days: usize,
}

#[derive(Debug)]
pub struct SinkReport {
    pub name: &'static str,
    pub outcome: SinkOutcome,
}

/// Structured per-stage result of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    pub sinks: Vec<SinkReport>,
    pub summary: LedgerSummary,
}

impl PipelineReport {
    /// True when every source read cleanly and no sink failed.
    pub fn fully_succeeded(&self) -> bool {
        self.sources.iter().all(|s| s.status == StageStatus::Ok)
            && self
                .sinks
                .iter()
                .all(|s| !matches!(s.outcome, SinkOutcome::Failed { .. }))
    }
}

/// Runs the full pipeline: read all sources, combine, summarize, then
/// publish to each sink in order. Sinks have no ordering dependency on
/// each other; an empty slice turns the run into a dry analysis.
pub async fn run(
    api: Option<&dyn SheetsApi>,
    sources: &[SourceSpec],
    sinks: &[Box<dyn Sink>],
) -> PipelineReport {
    info!(
        sources = sources.len(),
        sinks = sinks.len(),
        "Starting pipeline run"
    );

    let mut aggregates: Vec<LabeledAggregate> = Vec::with_capacity(sources.len());
    let mut source_reports = Vec::with_capacity(sources.len());
    for spec in sources {
        match read_source(api, spec).await {
            Ok(agg) => {
                source_reports.push(SourceReport {
                    label: agg.label.clone(),
                    status: StageStatus::Ok,
                    days: agg.days.len(),
                });
                aggregates.push(agg);
            }
            Err(e) => {
                // An empty aggregate keeps the remaining stages running;
                // the failure stays visible in the report.
                error!(
                    label = spec.label(),
                    error = %e,
                    "Source read failed, continuing with empty aggregate"
                );
                source_reports.push(SourceReport {
                    label: spec.label().to_string(),
                    status: StageStatus::Failed(e.to_string()),
                    days: 0,
                });
                aggregates.push(LabeledAggregate {
                    label: spec.label().to_string(),
                    days: DailyAggregate::new(),
                });
            }
        }
    }

    let ledger = combine(&aggregates);
    let summary = summarize(&ledger);
    info!(
        days = summary.days.len(),
        grand_total = summary.grand_total,
        grand_count = summary.grand_count,
        "Summary computed"
    );

    let mut sink_reports = Vec::with_capacity(sinks.len());
    for sink in sinks {
        let outcome = sink.publish(&summary).await;
        match &outcome {
            SinkOutcome::Published { detail } => {
                info!(sink = sink.name(), detail = %detail, "Sink published")
            }
            SinkOutcome::Skipped { reason } => {
                info!(sink = sink.name(), reason = %reason, "Sink skipped")
            }
            SinkOutcome::Failed { reason } => {
                error!(sink = sink.name(), reason = %reason, "Sink failed, continuing")
            }
        }
        sink_reports.push(SinkReport {
            name: sink.name(),
            outcome,
        });
    }

    PipelineReport {
        sources: source_reports,
        sinks: sink_reports,
        summary,
    }
}
