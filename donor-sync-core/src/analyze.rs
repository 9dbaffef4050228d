//! Pure summary statistics over the combined ledger. No I/O happens here
//! so the analysis stage stays independently testable.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::combine::CombinedLedger;

/// One output row: a date with per-source amounts and derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String,
    /// Source label → amount for this date. Labels absent here reported
    /// nothing for the date.
    pub amounts: BTreeMap<String, u64>,
    pub total: u64,
    pub count: u64,
    pub running_total: u64,
}

/// The serializable analysis result handed to every sink. Sinks must not
/// mutate it; they receive a shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// All contributing source labels, sorted.
    pub sources: Vec<String>,
    /// Per-date rows in date order.
    pub days: Vec<DaySummary>,
    pub grand_total: u64,
    pub grand_count: u64,
}

/// Derives per-date totals, counts and running totals from the ledger.
pub fn summarize(ledger: &CombinedLedger) -> LedgerSummary {
    let labels: BTreeSet<String> = ledger
        .values()
        .flat_map(|by_source| by_source.keys().cloned())
        .collect();

    let mut days = Vec::with_capacity(ledger.len());
    let mut running_total = 0u64;
    let mut grand_count = 0u64;
    for (date, by_source) in ledger {
        let total: u64 = by_source.values().map(|t| t.amount).sum();
        let count: u64 = by_source.values().map(|t| t.count).sum();
        running_total += total;
        grand_count += count;
        days.push(DaySummary {
            date: date.clone(),
            amounts: by_source
                .iter()
                .map(|(label, total)| (label.clone(), total.amount))
                .collect(),
            total,
            count,
            running_total,
        });
    }

    LedgerSummary {
        sources: labels.into_iter().collect(),
        days,
        grand_total: running_total,
        grand_count,
    }
}

/// Renders the 2-D grid written back to the spreadsheet: a header row, one
/// row per date and a trailing totals row.
pub fn to_grid(summary: &LedgerSummary) -> Vec<Vec<String>> {
    let mut header = vec!["date".to_string()];
    header.extend(summary.sources.iter().cloned());
    header.push("total".to_string());
    header.push("count".to_string());

    let mut grid = vec![header];
    for day in &summary.days {
        let mut row = vec![day.date.clone()];
        for label in &summary.sources {
            row.push(day.amounts.get(label).copied().unwrap_or(0).to_string());
        }
        row.push(day.total.to_string());
        row.push(day.count.to_string());
        grid.push(row);
    }

    let mut totals = vec!["total".to_string()];
    for label in &summary.sources {
        let sum: u64 = summary
            .days
            .iter()
            .filter_map(|day| day.amounts.get(label))
            .sum();
        totals.push(sum.to_string());
    }
    totals.push(summary.grand_total.to_string());
    totals.push(summary.grand_count.to_string());
    grid.push(totals);

    grid
}
