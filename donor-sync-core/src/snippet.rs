//! Snippet sink: serialize the summary to JSON and create or update a
//! remotely hosted snippet.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::analyze::LedgerSummary;
use crate::config::SnippetConfig;
use crate::contract::{SnippetFile, SnippetPayload, SnippetStore};
use crate::sink::{Sink, SinkOutcome};

pub struct SnippetSink<S> {
    config: SnippetConfig,
    store: S,
}

impl<S: SnippetStore> SnippetSink<S> {
    pub fn new(config: SnippetConfig, store: S) -> Self {
        Self { config, store }
    }
}

#[async_trait]
impl<S: SnippetStore> Sink for SnippetSink<S> {
    fn name(&self) -> &'static str {
        "snippet"
    }

    async fn publish(&self, summary: &LedgerSummary) -> SinkOutcome {
        if self.config.token.is_none() {
            info!("No snippet token configured, skipping snippet sink");
            return SinkOutcome::Skipped {
                reason: "no auth token configured".to_string(),
            };
        }

        // serde_json keeps non-ASCII characters unescaped, and the BTreeMap
        // fields in the summary give a stable key order.
        let content = match serde_json::to_string_pretty(summary) {
            Ok(json) => json,
            Err(e) => {
                error!(error = ?e, "Failed to serialize summary for snippet");
                return SinkOutcome::Failed {
                    reason: format!("serialize summary: {e}"),
                };
            }
        };

        let mut files = BTreeMap::new();
        files.insert(self.config.filename.clone(), SnippetFile { content });
        let payload = SnippetPayload {
            description: self.config.description.clone(),
            public: self.config.public,
            files,
        };

        let result = match &self.config.snippet_id {
            Some(id) => {
                info!(snippet_id = %id, "Updating existing snippet");
                self.store.update(id, payload).await
            }
            None => {
                info!("Creating new snippet");
                self.store.create(payload).await
            }
        };

        match result {
            Ok(handle) => {
                info!(snippet_id = %handle.id, url = %handle.url, "Snippet published");
                SinkOutcome::Published { detail: handle.url }
            }
            Err(e) => {
                error!(error = ?e, "Snippet publish failed");
                SinkOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
