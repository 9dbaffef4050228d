//! Sheet sink: write the summary grid back into a named tab of the
//! spreadsheet, creating the tab when absent.
//!
//! The write overwrites a block anchored at a fixed top-left cell; it does
//! not append. A tab created here is not rolled back if the subsequent
//! write fails.

use async_trait::async_trait;
use tracing::{error, info};

use crate::analyze::{to_grid, LedgerSummary};
use crate::config::SheetWriteConfig;
use crate::contract::SheetsApi;
use crate::sink::{Sink, SinkOutcome};

pub struct SheetSink<A> {
    config: SheetWriteConfig,
    api: A,
}

impl<A: SheetsApi> SheetSink<A> {
    pub fn new(config: SheetWriteConfig, api: A) -> Self {
        Self { config, api }
    }
}

#[async_trait]
impl<A: SheetsApi> Sink for SheetSink<A> {
    fn name(&self) -> &'static str {
        "sheet"
    }

    async fn publish(&self, summary: &LedgerSummary) -> SinkOutcome {
        let grid = to_grid(summary);

        let tabs = match self.api.list_tabs(&self.config.spreadsheet_id).await {
            Ok(tabs) => tabs,
            Err(e) => {
                error!(error = ?e, "Failed to list spreadsheet tabs");
                return SinkOutcome::Failed {
                    reason: format!("list tabs: {e}"),
                };
            }
        };

        if !tabs.iter().any(|t| t == &self.config.tab) {
            info!(tab = %self.config.tab, "Tab absent, creating it");
            if let Err(e) = self
                .api
                .add_tab(&self.config.spreadsheet_id, &self.config.tab)
                .await
            {
                error!(error = ?e, tab = %self.config.tab, "Failed to create tab");
                return SinkOutcome::Failed {
                    reason: format!("create tab: {e}"),
                };
            }
        }

        match self
            .api
            .write_range(
                &self.config.spreadsheet_id,
                &self.config.tab,
                &self.config.anchor,
                grid,
            )
            .await
        {
            Ok(cells) => {
                info!(
                    tab = %self.config.tab,
                    anchor = %self.config.anchor,
                    cells,
                    "Wrote summary grid"
                );
                SinkOutcome::Published {
                    detail: format!("{cells} cells updated"),
                }
            }
            Err(e) => {
                error!(error = ?e, tab = %self.config.tab, "Failed to write summary grid");
                SinkOutcome::Failed {
                    reason: format!("write values: {e}"),
                }
            }
        }
    }
}
