use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One tab of the remote tabular source and the block of cells to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSource {
    pub label: String,
    pub spreadsheet_id: String,
    pub tab: String,
    pub range: String,
}

/// A local CSV export treated as one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvSource {
    pub label: String,
    pub path: PathBuf,
}

/// Selects the type of source to read (sheet tab, CSV export, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    Sheet(SheetSource),
    Csv(CsvSource),
    // Extendable for other source types.
}

impl SourceSpec {
    /// The label this source contributes to the combined ledger.
    pub fn label(&self) -> &str {
        match self {
            SourceSpec::Sheet(s) => &s.label,
            SourceSpec::Csv(c) => &c.label,
        }
    }
}

/// Snippet sink configuration. Token and snippet id are injected by the
/// caller; a missing token turns the sink into a no-op.
#[derive(Debug, Clone)]
pub struct SnippetConfig {
    pub token: Option<String>,
    /// Existing snippet to update; absent means "create new".
    pub snippet_id: Option<String>,
    pub filename: String,
    pub description: String,
    pub public: bool,
}

/// Where the summary grid is written back: a named tab, anchored at a
/// fixed top-left cell.
#[derive(Debug, Clone)]
pub struct SheetWriteConfig {
    pub spreadsheet_id: String,
    pub tab: String,
    pub anchor: String,
}

/// Repository sink configuration.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    pub workdir: PathBuf,
    /// Target filename relative to the workdir.
    pub file: String,
    /// Commit message; absent means a timestamp-derived default.
    pub message: Option<String>,
}
