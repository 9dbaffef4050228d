//! # donor-sync CLI Interface (Module)
//!
//! This module implements the full CLI interface for donor-sync: command
//! parsing, sink construction from config + environment, and the async
//! entrypoints used by both `main()` and the integration tests.
//!
//! All pipeline logic (aggregation, combination, analysis, sinks) lives in
//! the `donor-sync-core` crate. This module is strictly CLI glue.
//!
//! ## Commands
//! - `publish` runs the full pipeline against every configured sink.
//! - `preview` runs read → combine → analyze only and prints the summary
//!   JSON, touching no sink.
//!
//! ## Environment
//! - `SHEETS_TOKEN`: bearer token for the tabular source (required only
//!   when a sheet source or the sheet sink is configured).
//! - `SNIPPET_TOKEN`: snippet service token; absent turns the snippet
//!   sink into a no-op.
//! - `SNIPPET_ID`: existing snippet to update; absent means create.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use donor_sync_core::config::{RepoConfig, SheetWriteConfig, SnippetConfig, SourceSpec};
use donor_sync_core::contract::SheetsApi;
use donor_sync_core::pipeline;
use donor_sync_core::repo::RepoSink;
use donor_sync_core::sheet::SheetSink;
use donor_sync_core::sink::Sink;
use donor_sync_core::snippet::SnippetSink;

use crate::gist::HttpSnippetClient;
use crate::load_config::{load_config, CliConfig};
use crate::sheets::HttpSheetsClient;

/// CLI for donor-sync: aggregate and publish supporter donation summaries.
#[derive(Parser)]
#[clap(
    name = "donor-sync",
    version,
    about = "Aggregate supporter donations from spreadsheet tabs and CSV exports, publish daily summaries to a snippet, a spreadsheet tab and a git repository"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and publish to every configured sink
    Publish {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Read and analyze without publishing; print the summary JSON
    Preview {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

fn sheet_sources_present(config: &CliConfig) -> bool {
    config
        .sources
        .iter()
        .any(|s| matches!(s, SourceSpec::Sheet(_)))
}

/// Builds the configured sinks, injecting secrets from the environment.
fn build_sinks(
    config: &CliConfig,
    sheets: Option<&HttpSheetsClient>,
) -> Result<Vec<Box<dyn Sink>>> {
    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();

    if let Some(snippet) = &config.publish.snippet {
        let token = env::var("SNIPPET_TOKEN").ok();
        let snippet_id = env::var("SNIPPET_ID").ok();
        let client = HttpSnippetClient::new(token.clone().unwrap_or_default());
        sinks.push(Box::new(SnippetSink::new(
            SnippetConfig {
                token,
                snippet_id,
                filename: snippet.filename.clone(),
                description: snippet.description.clone(),
                public: snippet.public,
            },
            client,
        )));
    }

    if let Some(sheet) = &config.publish.sheet {
        let client = sheets
            .ok_or_else(|| anyhow::anyhow!("sheet sink configured but no sheets client built"))?
            .clone();
        sinks.push(Box::new(SheetSink::new(
            SheetWriteConfig {
                spreadsheet_id: sheet.spreadsheet_id.clone(),
                tab: sheet.tab.clone(),
                anchor: sheet.anchor.clone(),
            },
            client,
        )));
    }

    if let Some(repo) = &config.publish.repo {
        sinks.push(Box::new(RepoSink::new(RepoConfig {
            workdir: repo.workdir.clone(),
            file: repo.file.clone(),
            message: repo.message.clone(),
        })));
    }

    Ok(sinks)
}

fn sheets_client(needed: bool) -> Result<Option<HttpSheetsClient>> {
    if !needed {
        return Ok(None);
    }
    HttpSheetsClient::new_from_env()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("Failed to construct sheets client: {e}"))
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Publish { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "publish", "Starting pipeline run");
            let sheets =
                sheets_client(sheet_sources_present(&config) || config.publish.sheet.is_some())?;
            let sinks = build_sinks(&config, sheets.as_ref())?;
            let report = pipeline::run(
                sheets.as_ref().map(|c| c as &dyn SheetsApi),
                &config.sources,
                &sinks,
            )
            .await;
            tracing::info!(command = "publish", ?report, "Pipeline run complete");
            println!("{report:#?}");
            if report.fully_succeeded() {
                Ok(())
            } else {
                Err(anyhow::anyhow!(
                    "one or more pipeline stages failed; see the report above"
                ))
            }
        }
        Commands::Preview { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "preview", "Starting dry analysis");
            let sheets = sheets_client(sheet_sources_present(&config))?;
            let report = pipeline::run(
                sheets.as_ref().map(|c| c as &dyn SheetsApi),
                &config.sources,
                &[],
            )
            .await;
            println!("{}", serde_json::to_string_pretty(&report.summary)?);
            Ok(())
        }
    }
}
