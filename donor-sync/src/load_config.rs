/// `load_config` module: loads and adapts a static YAML config into the
/// typed source and sink configuration the core pipeline consumes.
///
/// This is the only place where untrusted YAML is parsed. Secrets (the
/// snippet token and snippet id) are never read from the file; they are
/// injected from the environment when the sinks are built in `cli`.
///
/// # Errors
/// All errors here use `anyhow::Error` for context-rich diagnostics and
/// are surfaced at the CLI boundary.
use anyhow::Result;
use donor_sync_core::config::SourceSpec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
    #[serde(default)]
    pub publish: PublishSection,
}

/// Every sink section is optional; an omitted sink is simply not built.
#[derive(Debug, Default, Deserialize)]
pub struct PublishSection {
    pub snippet: Option<SnippetSection>,
    pub sheet: Option<SheetSection>,
    pub repo: Option<RepoSection>,
}

#[derive(Debug, Deserialize)]
pub struct SnippetSection {
    pub filename: String,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub public: bool,
}

fn default_description() -> String {
    "Daily supporter summary".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SheetSection {
    pub spreadsheet_id: String,
    pub tab: String,
    #[serde(default = "default_anchor")]
    pub anchor: String,
}

fn default_anchor() -> String {
    "A1".to_string()
}

#[derive(Debug, Deserialize)]
pub struct RepoSection {
    pub workdir: PathBuf,
    pub file: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    Ok(config)
}
