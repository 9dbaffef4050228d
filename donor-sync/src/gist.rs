#![doc = "Snippet client: bridges the core's SnippetStore contract to the snippet service's REST API."]
//
//! # Snippet integration (CLI <-> Core)
//!
//! Implements [`SnippetStore`] against the git-hosted snippet service:
//! `POST /gists` creates a snippet, `PATCH /gists/{id}` updates one in
//! place. HTTP 200 and 201 are the only success codes; everything else is
//! surfaced as an error for the snippet sink to fold into its outcome.
//!
//! `SNIPPET_BASE_URL` optionally overrides the service endpoint (useful
//! against a stub server in tests).

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use std::env;

use donor_sync_core::contract::{ApiError, SnippetHandle, SnippetPayload, SnippetStore};

pub struct HttpSnippetClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpSnippetClient {
    pub fn new(token: String) -> Self {
        dotenvy::dotenv().ok();
        let base_url = env::var("SNIPPET_BASE_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());
        tracing::info!(
            token_set = !token.is_empty(),
            base_url = %base_url,
            "Initialized snippet client"
        );
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn handle_response(resp: reqwest::Response) -> Result<SnippetHandle, ApiError> {
        #[derive(Debug, Deserialize)]
        struct SnippetResponse {
            id: String,
            html_url: String,
        }

        let status = resp.status();
        if status.as_u16() != 200 && status.as_u16() != 201 {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Snippet service returned error: {body}");
            return Err(format!("snippet service returned {status}").into());
        }
        let body: SnippetResponse = resp.json().await?;
        Ok(SnippetHandle {
            id: body.id,
            url: body.html_url,
        })
    }
}

#[async_trait]
impl SnippetStore for HttpSnippetClient {
    async fn create(&self, payload: SnippetPayload) -> Result<SnippetHandle, ApiError> {
        let url = format!("{}/gists", self.base_url);
        tracing::info!(url = %url, "Creating snippet");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(header::USER_AGENT, "donor-sync")
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn update(
        &self,
        snippet_id: &str,
        payload: SnippetPayload,
    ) -> Result<SnippetHandle, ApiError> {
        let url = format!("{}/gists/{}", self.base_url, snippet_id);
        tracing::info!(url = %url, "Updating snippet");
        let resp = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .header(header::USER_AGENT, "donor-sync")
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?;
        Self::handle_response(resp).await
    }
}
