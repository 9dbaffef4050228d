#![doc = "Spreadsheet client: bridges the core's SheetsApi contract to the real range-based REST API."]
//
//! # Spreadsheet integration (CLI <-> Core)
//!
//! Implements [`SheetsApi`] over the spreadsheet service's REST endpoints:
//! range reads, tab listing, tab creation (batchUpdate) and anchored bulk
//! writes. All transport, serialization and status handling live here; the
//! core pipeline only sees the trait.
//!
//! Construct [`HttpSheetsClient`] with [`HttpSheetsClient::new_from_env`]:
//! `SHEETS_TOKEN` is required, `SHEETS_BASE_URL` optionally overrides the
//! service endpoint (useful against a stub server in tests).

use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use donor_sync_core::contract::{ApiError, SheetsApi};

#[derive(Clone)]
pub struct HttpSheetsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSheetsClient {
    pub fn new_from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        match env::var("SHEETS_TOKEN") {
            Ok(token) => {
                let base_url = env::var("SHEETS_BASE_URL")
                    .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string());
                tracing::info!(
                    token_set = !token.is_empty(),
                    base_url = %base_url,
                    "Initialized sheets client from environment"
                );
                Ok(Self {
                    http: reqwest::Client::new(),
                    base_url: base_url.trim_end_matches('/').to_string(),
                    token,
                })
            }
            Err(e) => {
                tracing::error!(error = ?e, "SHEETS_TOKEN missing in environment");
                Err(Box::new(e))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    #[serde(default)]
    updated_cells: u64,
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetsApi for HttpSheetsClient {
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, ApiError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!{}",
            self.base_url, spreadsheet_id, tab, range
        );
        tracing::info!(url = %url, "Fetching cell range");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, url = %url, "Range read failed: {body}");
            return Err(format!("range read returned {status}").into());
        }
        let body: ValueRange = resp.json().await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn list_tabs(&self, spreadsheet_id: &str) -> Result<Vec<String>, ApiError> {
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.base_url, spreadsheet_id
        );
        tracing::info!(url = %url, "Listing spreadsheet tabs");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::error!(status = %status, url = %url, "Tab listing failed");
            return Err(format!("tab listing returned {status}").into());
        }
        let meta: SpreadsheetMeta = resp.json().await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    async fn add_tab(&self, spreadsheet_id: &str, title: &str) -> Result<(), ApiError> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, spreadsheet_id
        );
        let body = serde_json::json!({
            "requests": [{ "addSheet": { "properties": { "title": title } } }]
        });
        tracing::info!(url = %url, title, "Creating spreadsheet tab");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::error!(status = %status, title, "Tab creation failed");
            return Err(format!("tab creation returned {status}").into());
        }
        Ok(())
    }

    async fn write_range(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        anchor: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<u64, ApiError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!{}?valueInputOption=RAW",
            self.base_url, spreadsheet_id, tab, anchor
        );
        tracing::info!(url = %url, rows = rows.len(), "Writing cell range");
        let body = serde_json::json!({ "values": rows });
        let resp = self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, url = %url, "Range write failed: {text}");
            return Err(format!("range write returned {status}").into());
        }
        let update: UpdateResponse = resp.json().await?;
        tracing::info!(updated_cells = update.updated_cells, "Range write succeeded");
        Ok(update.updated_cells)
    }
}
