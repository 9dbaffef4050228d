//! Merges per-source aggregates into one date-keyed ledger.

use std::collections::BTreeMap;

use crate::aggregate::{DayTotal, LabeledAggregate};

/// Date → (source label → totals), keyed by the union of all dates present
/// in any input. A label absent under a date means that source reported
/// nothing for it.
pub type CombinedLedger = BTreeMap<String, BTreeMap<String, DayTotal>>;

/// Joins the inputs on the date key. No deduplication across sources: the
/// same underlying transaction reported by two sources is counted twice.
pub fn combine(inputs: &[LabeledAggregate]) -> CombinedLedger {
    let mut ledger = CombinedLedger::new();
    for input in inputs {
        for (date, total) in &input.days {
            let slot = ledger
                .entry(date.clone())
                .or_default()
                .entry(input.label.clone())
                .or_default();
            slot.amount += total.amount;
            slot.count += total.count;
        }
    }
    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DailyAggregate;

    fn aggregate(label: &str, days: &[(&str, u64, u64)]) -> LabeledAggregate {
        let mut agg = DailyAggregate::new();
        for (date, amount, count) in days {
            agg.insert(
                date.to_string(),
                DayTotal {
                    amount: *amount,
                    count: *count,
                },
            );
        }
        LabeledAggregate {
            label: label.to_string(),
            days: agg,
        }
    }

    #[test]
    fn combines_on_the_union_of_dates() {
        let manual = aggregate("manual", &[("2024-01-01", 100, 1), ("2024-01-02", 50, 2)]);
        let bank = aggregate("bank", &[("2024-01-02", 75, 1), ("2024-01-03", 30, 1)]);

        let ledger = combine(&[manual, bank]);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger["2024-01-01"]["manual"].amount, 100);
        assert!(ledger["2024-01-01"].get("bank").is_none());
        assert_eq!(ledger["2024-01-02"]["manual"].amount, 50);
        assert_eq!(ledger["2024-01-02"]["bank"].amount, 75);
        assert_eq!(ledger["2024-01-03"]["bank"].count, 1);
    }

    #[test]
    fn disjoint_inputs_are_preserved_verbatim() {
        let a = aggregate("a", &[("2024-01-01", 10, 1), ("2024-01-05", 20, 2)]);
        let b = aggregate("b", &[("2024-02-01", 99, 3)]);

        let ledger = combine(&[a.clone(), b]);
        for (date, total) in &a.days {
            assert_eq!(ledger[date]["a"], *total);
        }
    }

    #[test]
    fn duplicate_labels_are_summed_not_deduplicated() {
        let first = aggregate("manual", &[("2024-01-01", 40, 1)]);
        let second = aggregate("manual", &[("2024-01-01", 60, 1)]);

        let ledger = combine(&[first, second]);
        assert_eq!(ledger["2024-01-01"]["manual"].amount, 100);
        assert_eq!(ledger["2024-01-01"]["manual"].count, 2);
    }

    #[test]
    fn no_inputs_yield_an_empty_ledger() {
        assert!(combine(&[]).is_empty());
    }
}
