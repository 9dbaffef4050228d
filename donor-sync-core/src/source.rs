//! Source readers: pull raw rows from the tabular source or a CSV export
//! and aggregate them per date.
//!
//! Readers return `Err` on transport failure instead of swallowing it; the
//! orchestrator decides whether to degrade to an empty aggregate and
//! continue (see [`crate::pipeline`]). An empty result set is not an error.

use thiserror::Error;
use tracing::info;

use crate::aggregate::{accumulate_rows, DailyAggregate, LabeledAggregate};
use crate::config::{CsvSource, SheetSource, SourceSpec};
use crate::contract::SheetsApi;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("tabular source fetch failed: {0}")]
    Fetch(String),
    #[error("csv read failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Fetches the configured range and aggregates it. The header row and any
/// malformed rows are skipped inside [`accumulate_rows`].
pub async fn read_sheet_source(
    api: &dyn SheetsApi,
    source: &SheetSource,
) -> Result<DailyAggregate, SourceError> {
    info!(
        label = %source.label,
        tab = %source.tab,
        range = %source.range,
        "Fetching rows from tabular source"
    );
    let rows = api
        .read_range(&source.spreadsheet_id, &source.tab, &source.range)
        .await
        .map_err(|e| SourceError::Fetch(e.to_string()))?;
    if rows.is_empty() {
        info!(label = %source.label, "Source returned no rows");
        return Ok(DailyAggregate::new());
    }
    let days = accumulate_rows(&rows);
    info!(label = %source.label, days = days.len(), "Aggregated sheet rows");
    Ok(days)
}

/// Reads a local CSV export with the same two-column extraction and
/// filtering rules as the sheet reader.
pub fn read_csv_source(source: &CsvSource) -> Result<DailyAggregate, SourceError> {
    info!(
        label = %source.label,
        path = %source.path.display(),
        "Reading CSV export"
    );
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&source.path)?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    let days = accumulate_rows(&rows);
    info!(label = %source.label, days = days.len(), "Aggregated CSV rows");
    Ok(days)
}

/// Reads one configured source of any kind into a labeled aggregate.
/// Sheet sources need a client; without one they fail like any other
/// fetch failure and the orchestrator degrades them to empty.
pub async fn read_source(
    api: Option<&dyn SheetsApi>,
    spec: &SourceSpec,
) -> Result<LabeledAggregate, SourceError> {
    let days = match spec {
        SourceSpec::Sheet(s) => match api {
            Some(api) => read_sheet_source(api, s).await?,
            None => {
                return Err(SourceError::Fetch(
                    "no tabular source client configured".to_string(),
                ))
            }
        },
        SourceSpec::Csv(c) => read_csv_source(c)?,
    };
    Ok(LabeledAggregate {
        label: spec.label().to_string(),
        days,
    })
}
