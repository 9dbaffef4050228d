//! Repository sink: write the summary to a file inside a version-controlled
//! working tree and commit/push it, skipping the commit when the staged
//! diff is empty.
//!
//! Git is driven through `std::process::Command`; the exit code of
//! `git diff --staged --quiet` is the "any changes?" signal. The file write
//! is not rolled back if a later git step fails.

use async_trait::async_trait;
use chrono::Utc;
use std::process::{Command, Output};
use tracing::{debug, error, info};

use crate::analyze::LedgerSummary;
use crate::config::RepoConfig;
use crate::sink::{Sink, SinkOutcome};

pub struct RepoSink {
    config: RepoConfig,
}

impl RepoSink {
    pub fn new(config: RepoConfig) -> Self {
        Self { config }
    }

    fn git(&self, args: &[&str]) -> Result<Output, std::io::Error> {
        debug!(args = ?args, workdir = %self.config.workdir.display(), "Running git");
        Command::new("git")
            .arg("-C")
            .arg(&self.config.workdir)
            .args(args)
            .output()
    }

    fn git_ok(&self, args: &[&str]) -> Result<(), String> {
        match self.git(args) {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => Err(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )),
            Err(e) => Err(format!("failed to launch git {}: {e}", args.join(" "))),
        }
    }

    /// Configures a repo-local committer identity when none is set.
    fn ensure_identity(&self) -> Result<(), String> {
        let unset = self
            .git(&["config", "user.name"])
            .map(|out| !out.status.success())
            .unwrap_or(true);
        if unset {
            info!("No committer identity configured, setting one");
            self.git_ok(&["config", "user.name", "donor-sync"])?;
            self.git_ok(&["config", "user.email", "donor-sync@localhost"])?;
        }
        Ok(())
    }
}

#[async_trait]
impl Sink for RepoSink {
    fn name(&self) -> &'static str {
        "repo"
    }

    async fn publish(&self, summary: &LedgerSummary) -> SinkOutcome {
        let content = match serde_json::to_string_pretty(summary) {
            Ok(json) => json,
            Err(e) => {
                error!(error = ?e, "Failed to serialize summary for repository");
                return SinkOutcome::Failed {
                    reason: format!("serialize summary: {e}"),
                };
            }
        };

        let target = self.config.workdir.join(&self.config.file);
        if let Err(e) = std::fs::write(&target, content) {
            error!(error = ?e, path = %target.display(), "Failed to write summary file");
            return SinkOutcome::Failed {
                reason: format!("write {}: {e}", target.display()),
            };
        }

        if let Err(reason) = self.ensure_identity() {
            error!(reason = %reason, "Failed to configure committer identity");
            return SinkOutcome::Failed { reason };
        }

        if let Err(reason) = self.git_ok(&["add", &self.config.file]) {
            error!(reason = %reason, "Failed to stage summary file");
            return SinkOutcome::Failed { reason };
        }

        // Exit 0 means the staged diff is empty: nothing to commit.
        match self.git(&["diff", "--staged", "--quiet"]) {
            Ok(out) if out.status.success() => {
                info!(file = %self.config.file, "No staged changes, skipping commit and push");
                return SinkOutcome::Published {
                    detail: "no changes".to_string(),
                };
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = ?e, "Failed to inspect staged diff");
                return SinkOutcome::Failed {
                    reason: format!("failed to launch git diff: {e}"),
                };
            }
        }

        let message = self.config.message.clone().unwrap_or_else(|| {
            format!(
                "Update {} at {}",
                self.config.file,
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            )
        });

        if let Err(reason) = self.git_ok(&["commit", "-m", &message]) {
            error!(reason = %reason, "Commit failed");
            return SinkOutcome::Failed { reason };
        }
        if let Err(reason) = self.git_ok(&["push"]) {
            error!(reason = %reason, "Push failed");
            return SinkOutcome::Failed { reason };
        }

        info!(file = %self.config.file, message = %message, "Committed and pushed summary");
        SinkOutcome::Published {
            detail: format!("committed and pushed {}", self.config.file),
        }
    }
}
