//! Contract traits between the core pipeline and external services.
//!
//! The pipeline never talks to the network directly: it goes through these
//! traits, implemented by real HTTP clients in the `donor-sync` crate and
//! by `mockall` mocks in tests. All methods are async and return boxed
//! errors; the implementor is responsible for transport, auth and
//! status-code handling.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use std::collections::BTreeMap;

/// Uniform boxed error for contract-trait boundaries.
pub type ApiError = Box<dyn std::error::Error + Send + Sync>;

/// One file inside a snippet payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetFile {
    pub content: String,
}

/// The body sent to the snippet service on create/update. Files are keyed
/// by filename; a `BTreeMap` keeps the serialized key order stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetPayload {
    pub description: String,
    pub public: bool,
    pub files: BTreeMap<String, SnippetFile>,
}

/// Metadata returned by the snippet service after a create or update.
#[derive(Debug, Clone)]
pub struct SnippetHandle {
    pub id: String,
    /// Retrieval URL for the hosted snippet.
    pub url: String,
}

/// Trait for creating and updating remotely hosted text snippets.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Create a new snippet and return its handle.
    async fn create(&self, payload: SnippetPayload) -> Result<SnippetHandle, ApiError>;

    /// Update an existing snippet in place.
    async fn update(
        &self,
        snippet_id: &str,
        payload: SnippetPayload,
    ) -> Result<SnippetHandle, ApiError>;
}

/// Trait for range-based reads and writes against the tabular source.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Fetch a rectangular block of cell values from a named tab.
    async fn read_range(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, ApiError>;

    /// List the titles of all tabs in the spreadsheet.
    async fn list_tabs(&self, spreadsheet_id: &str) -> Result<Vec<String>, ApiError>;

    /// Create a new, empty tab with the given title.
    async fn add_tab(&self, spreadsheet_id: &str, title: &str) -> Result<(), ApiError>;

    /// Overwrite a block of cells starting at the anchor; returns the
    /// number of cells updated.
    async fn write_range(
        &self,
        spreadsheet_id: &str,
        tab: &str,
        anchor: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<u64, ApiError>;
}
