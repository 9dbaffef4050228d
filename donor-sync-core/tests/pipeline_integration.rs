use serial_test::serial;
use std::io::Write;

use donor_sync_core::config::{CsvSource, SheetSource, SnippetConfig, SourceSpec};
use donor_sync_core::contract::{MockSheetsApi, MockSnippetStore, SnippetHandle};
use donor_sync_core::pipeline::{run, StageStatus};
use donor_sync_core::sink::{Sink, SinkOutcome};
use donor_sync_core::snippet::SnippetSink;

fn sheet_spec() -> SourceSpec {
    SourceSpec::Sheet(SheetSource {
        label: "manual".to_string(),
        spreadsheet_id: "sheet-1".to_string(),
        tab: "Manual Donations".to_string(),
        range: "A1:B400".to_string(),
    })
}

fn snippet_sink(store: MockSnippetStore) -> Box<dyn Sink> {
    Box::new(SnippetSink::new(
        SnippetConfig {
            token: Some("token".to_string()),
            snippet_id: None,
            filename: "daily_summary.json".to_string(),
            description: "Daily supporter summary".to_string(),
            public: false,
        },
        store,
    ))
}

fn rows(raw: &[(&str, &str)]) -> Vec<Vec<String>> {
    raw.iter()
        .map(|(d, a)| vec![d.to_string(), a.to_string()])
        .collect()
}

#[tokio::test]
#[serial]
async fn full_run_reads_combines_and_publishes() {
    let mut api = MockSheetsApi::new();
    api.expect_read_range()
        .times(1)
        .withf(|id, tab, range| id == "sheet-1" && tab == "Manual Donations" && range == "A1:B400")
        .returning(|_, _, _| {
            Ok(rows(&[
                ("date", "amount"),
                ("2024-01-01", "1,000"),
                ("2024-01-01", "500"),
                ("2024-01-02", "abc"),
            ]))
        });

    let mut store = MockSnippetStore::new();
    store.expect_create().times(1).returning(|_| {
        Ok(SnippetHandle {
            id: "s1".to_string(),
            url: "https://snippets.example/s1".to_string(),
        })
    });

    let sinks = vec![snippet_sink(store)];
    let report = run(Some(&api), &[sheet_spec()], &sinks).await;

    assert!(report.fully_succeeded());
    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.sources[0].status, StageStatus::Ok);
    assert_eq!(report.sources[0].days, 1);

    // Malformed row skipped; the two valid rows aggregate under one date.
    assert_eq!(report.summary.days.len(), 1);
    assert_eq!(report.summary.days[0].date, "2024-01-01");
    assert_eq!(report.summary.days[0].total, 1500);
    assert_eq!(report.summary.days[0].count, 2);

    assert_eq!(report.sinks.len(), 1);
    assert!(matches!(
        report.sinks[0].outcome,
        SinkOutcome::Published { .. }
    ));
}

#[tokio::test]
#[serial]
async fn empty_fetch_result_is_not_an_error() {
    let mut api = MockSheetsApi::new();
    api.expect_read_range().returning(|_, _, _| Ok(vec![]));

    let report = run(Some(&api), &[sheet_spec()], &[]).await;
    assert_eq!(report.sources[0].status, StageStatus::Ok);
    assert_eq!(report.sources[0].days, 0);
    assert!(report.summary.days.is_empty());
}

#[tokio::test]
#[serial]
async fn failed_source_degrades_to_empty_and_the_run_still_publishes() {
    let mut api = MockSheetsApi::new();
    api.expect_read_range()
        .returning(|_, _, _| Err("connection refused".into()));

    // A CSV source that works alongside the failing sheet source.
    let mut csv_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv_file, "Date,Amount").unwrap();
    writeln!(csv_file, "2024-01-05,250").unwrap();
    csv_file.flush().unwrap();
    let csv_spec = SourceSpec::Csv(CsvSource {
        label: "bank".to_string(),
        path: csv_file.path().to_path_buf(),
    });

    let mut store = MockSnippetStore::new();
    store.expect_create().times(1).returning(|_| {
        Ok(SnippetHandle {
            id: "s2".to_string(),
            url: "https://snippets.example/s2".to_string(),
        })
    });

    let sinks = vec![snippet_sink(store)];
    let report = run(Some(&api), &[sheet_spec(), csv_spec], &sinks).await;

    assert!(!report.fully_succeeded());
    assert!(matches!(report.sources[0].status, StageStatus::Failed(_)));
    assert_eq!(report.sources[1].status, StageStatus::Ok);

    // The failed source contributed nothing; the CSV data still flows.
    assert_eq!(report.summary.days.len(), 1);
    assert_eq!(report.summary.grand_total, 250);
    assert!(matches!(
        report.sinks[0].outcome,
        SinkOutcome::Published { .. }
    ));
}

#[tokio::test]
#[serial]
async fn failed_sink_does_not_prevent_later_sinks() {
    let mut api = MockSheetsApi::new();
    api.expect_read_range().returning(|_, _, _| {
        Ok(rows(&[("date", "amount"), ("2024-01-01", "100")]))
    });

    let mut failing_store = MockSnippetStore::new();
    failing_store
        .expect_create()
        .returning(|_| Err("snippet service returned 500".into()));

    let mut working_store = MockSnippetStore::new();
    working_store.expect_create().times(1).returning(|_| {
        Ok(SnippetHandle {
            id: "s3".to_string(),
            url: "https://snippets.example/s3".to_string(),
        })
    });

    let sinks = vec![snippet_sink(failing_store), snippet_sink(working_store)];
    let report = run(Some(&api), &[sheet_spec()], &sinks).await;

    assert!(!report.fully_succeeded());
    assert!(matches!(report.sinks[0].outcome, SinkOutcome::Failed { .. }));
    assert!(matches!(
        report.sinks[1].outcome,
        SinkOutcome::Published { .. }
    ));
}

#[tokio::test]
#[serial]
async fn sheet_source_without_a_client_fails_but_the_run_finishes() {
    let report = run(None, &[sheet_spec()], &[]).await;
    assert!(matches!(report.sources[0].status, StageStatus::Failed(_)));
    assert!(report.summary.days.is_empty());
}
