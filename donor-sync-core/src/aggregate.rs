//! Date-keyed aggregation of raw rows.
//!
//! The raw input is a rectangular block of cell values with no prior
//! validation: column 1 holds a date string, column 2 an amount string that
//! may carry thousands separators. Rows that do not yield a strictly
//! positive integer amount are skipped, never raised.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Running totals for a single date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    pub amount: u64,
    pub count: u64,
}

/// Date-keyed summary of amount and occurrence count. Absent dates mean
/// zero; every present key has `count >= 1`.
pub type DailyAggregate = BTreeMap<String, DayTotal>;

/// An aggregate tagged with the label of the source that produced it.
#[derive(Debug, Clone)]
pub struct LabeledAggregate {
    pub label: String,
    pub days: DailyAggregate,
}

/// Parses a raw amount cell. Thousands separators are stripped; the rest
/// must be all ASCII digits and parse to a strictly positive integer.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match cleaned.parse::<u64>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}

/// Folds raw rows into a [`DailyAggregate`]. The first row is the header
/// and is skipped; malformed rows are logged and skipped.
pub fn accumulate_rows(rows: &[Vec<String>]) -> DailyAggregate {
    let mut days = DailyAggregate::new();
    for (idx, row) in rows.iter().enumerate().skip(1) {
        let date = match row.first().map(|s| s.trim()) {
            Some(d) if !d.is_empty() => d,
            _ => {
                debug!(row = idx, "Skipping row without a date");
                continue;
            }
        };
        let raw_amount = row.get(1).map(String::as_str).unwrap_or("");
        match parse_amount(raw_amount) {
            Some(amount) => {
                let entry = days.entry(date.to_string()).or_default();
                entry.amount += amount;
                entry.count += 1;
            }
            None => {
                debug!(
                    row = idx,
                    amount = raw_amount,
                    "Skipping row with non-numeric or non-positive amount"
                );
            }
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[(&str, &str)]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|(d, a)| vec![d.to_string(), a.to_string()])
            .collect()
    }

    #[test]
    fn parse_amount_strips_thousands_separators() {
        assert_eq!(parse_amount("1,000"), Some(1000));
        assert_eq!(parse_amount("12,345,678"), Some(12_345_678));
        assert_eq!(parse_amount(" 500 "), Some(500));
    }

    #[test]
    fn parse_amount_rejects_non_numeric_and_non_positive() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1.50"), None);
        assert_eq!(parse_amount("1 000"), None);
    }

    #[test]
    fn accumulates_valid_rows_and_skips_malformed_ones() {
        let input = rows(&[
            ("date", "amount"),
            ("2024-01-01", "1,000"),
            ("2024-01-01", "500"),
            ("2024-01-02", "abc"),
        ]);
        let agg = accumulate_rows(&input);
        assert_eq!(agg.len(), 1);
        let day = agg.get("2024-01-01").expect("date should be present");
        assert_eq!(day.amount, 1500);
        assert_eq!(day.count, 2);
        assert!(agg.get("2024-01-02").is_none());
    }

    #[test]
    fn header_only_input_yields_empty_aggregate() {
        let input = rows(&[("date", "amount")]);
        assert!(accumulate_rows(&input).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_aggregate() {
        assert!(accumulate_rows(&[]).is_empty());
    }

    #[test]
    fn rows_without_date_or_amount_cell_are_skipped() {
        let input = vec![
            vec!["date".to_string(), "amount".to_string()],
            vec!["".to_string(), "100".to_string()],
            vec!["2024-01-03".to_string()],
            vec!["2024-01-03".to_string(), "250".to_string()],
        ];
        let agg = accumulate_rows(&input);
        assert_eq!(agg.len(), 1);
        assert_eq!(agg.get("2024-01-03").unwrap().amount, 250);
        assert_eq!(agg.get("2024-01-03").unwrap().count, 1);
    }
}
