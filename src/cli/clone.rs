//
//  bucket-cloner
//  cli/clone.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! The `clone` command
//!
//! Lists and selects workspaces, lists every repository of the selection,
//! then hands them to the [`Orchestrator`]. Anything that makes the whole
//! run pointless (bad credentials, unknown workspace) fails before the
//! first clone starts.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::api::cloud::{Repository, Workspace};
use crate::api::{ApiError, BitbucketClient};
use crate::auth::AuthMode;
use crate::config::Config;
use crate::exit_codes;
use crate::output::OutputWriter;
use crate::selector;
use crate::sync::{
    CancelFlag, CloneTarget, GitCli, ListingFailure, Orchestrator, Outcome, RepoResult, Summary,
    SyncMode, SyncObserver, SyncOptions, SyncReport,
};

use super::GlobalOptions;

/// Clone or update every repository of the selected workspaces
#[derive(Args, Debug)]
pub struct CloneCommand {}

/// Options of the `clone` command.
///
/// Declared global so they can precede the command name.
#[derive(Args, Debug, Clone, Default)]
pub struct CloneArgs {
    /// Keep existing repository folders untouched
    #[arg(long, short = 's', global = true, conflicts_with = "refresh")]
    pub skip_existing: bool,

    /// Pull changes into existing repository folders instead of recloning
    #[arg(long, short = 'r', global = true)]
    pub refresh: bool,

    /// Folder the workspace folders are created in (default: current directory)
    #[arg(long, short = 'b', global = true, env = "BUCKETCLONER_BASE_FOLDER")]
    pub base_folder: Option<PathBuf>,

    /// Group repositories in a folder per project key
    #[arg(long, visible_alias = "project-folder", global = true)]
    pub project_folders: bool,

    /// Only clone repositories of this project key
    #[arg(long, short = 'p', global = true)]
    pub project: Option<String>,

    /// Clone over HTTPS with the API token, or over SSH with your keys
    #[arg(long, global = true, value_enum, env = "BUCKETCLONER_AUTH_MODE")]
    pub auth_mode: Option<AuthMode>,

    /// Number of repositories processed in parallel
    #[arg(long, short = 'j', global = true, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub jobs: Option<u16>,
}

impl CloneArgs {
    /// Merges flags with configured defaults. Flags win.
    pub fn resolve(&self, config: &Config) -> SyncOptions {
        let defaults = &config.clone;

        let mode = if self.skip_existing {
            SyncMode::SkipExisting
        } else if self.refresh {
            SyncMode::Refresh
        } else {
            defaults.mode.unwrap_or_default()
        };

        SyncOptions {
            base_folder: self
                .base_folder
                .clone()
                .or_else(|| defaults.base_folder.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            mode,
            auth_mode: self.auth_mode.or(defaults.auth_mode).unwrap_or_default(),
            project_folders: self.project_folders || defaults.project_folders.unwrap_or(false),
            jobs: self
                .jobs
                .map(usize::from)
                .or(defaults.jobs)
                .unwrap_or(1)
                .max(1),
        }
    }
}

impl CloneCommand {
    /// Runs a clone and returns the process exit code.
    pub async fn run(&self, global: &GlobalOptions, args: &CloneArgs) -> Result<i32> {
        let config = global.load_config()?;
        let credentials = global.credentials()?;
        let client = global.client(credentials.clone())?;
        let writer = OutputWriter::from_json_flag(global.json);
        let options = args.resolve(&config);

        tracing::debug!(?options, "resolved clone options");

        let all = client
            .list_workspaces()
            .collect_all()
            .await
            .context("Failed to list workspaces")?;
        let selected = selector::select(all, &global.requested_workspaces(&config))?;

        let (repositories, listing_failures) =
            list_repositories(&client, &selected, args.project.as_deref(), &writer).await?;

        if repositories.is_empty() {
            writer.write_info("No repositories found.");
        }

        let cancel = CancelFlag::new();
        cancel.cancel_on_ctrl_c();

        let orchestrator = Orchestrator::new(Arc::new(GitCli::new()), credentials, options);
        let mut progress = Progress::new(repositories.len() as u64, &writer);
        let mut report = orchestrator.run(repositories, &cancel, &mut progress).await;
        progress.finish();
        report.listing_failures = listing_failures;

        write_report(&report, &writer)?;

        Ok(if report.is_success() {
            exit_codes::SUCCESS
        } else {
            exit_codes::PARTIAL_FAILURE
        })
    }
}

/// Lists the repositories of every selected workspace.
///
/// A workspace whose listing fails is reported and skipped; an
/// authentication failure aborts the run.
async fn list_repositories(
    client: &BitbucketClient,
    workspaces: &[Workspace],
    project: Option<&str>,
    writer: &OutputWriter,
) -> Result<(Vec<Repository>, Vec<ListingFailure>)> {
    let mut repositories = Vec::new();
    let mut failures = Vec::new();

    for workspace in workspaces {
        match client.list_repositories(&workspace.slug, project).collect_all().await {
            Ok(found) => {
                tracing::info!(workspace = %workspace.slug, count = found.len(), "listed repositories");
                repositories.extend(found);
            }
            Err(e @ ApiError::Authentication(_)) => {
                return Err(e).with_context(|| {
                    format!("Failed to list repositories of workspace '{}'", workspace.slug)
                });
            }
            Err(e) => {
                writer.write_warning(&format!(
                    "Failed to list repositories of workspace '{}': {}",
                    workspace.slug, e
                ));
                failures.push(ListingFailure {
                    workspace: workspace.slug.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok((repositories, failures))
}

/// Progress bar plus one line per finished repository.
struct Progress<'a> {
    bar: ProgressBar,
    writer: &'a OutputWriter,
}

impl<'a> Progress<'a> {
    fn new(total: u64, writer: &'a OutputWriter) -> Self {
        let bar = if writer.is_json() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(total)
        };
        let template = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(template);

        Self { bar, writer }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl SyncObserver for Progress<'_> {
    fn started(&mut self, target: &CloneTarget) {
        self.bar.set_message(target.repository.full_name());
    }

    fn finished(&mut self, result: &RepoResult) {
        self.bar.inc(1);
        if self.writer.is_json() {
            return;
        }

        let writer = self.writer;
        let path = result.local_path.display();
        self.bar.suspend(|| match &result.outcome {
            Outcome::Cloned => writer.write_success(&format!("Cloned {} into {}", result.repository, path)),
            Outcome::Refreshed => writer.write_success(&format!("Pulled changes for {} in {}", result.repository, path)),
            Outcome::Skipped => writer.write_info(&format!("- Skipped {} ({})", result.repository, path)),
            Outcome::Failed(e) => writer.write_error(&format!("{}: {}", result.repository, e)),
        });
    }
}

/// `--json` shape of a finished run.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    summary: Summary,
    repositories: Vec<RepoEntry<'a>>,
    listing_failures: &'a [ListingFailure],
    interrupted: bool,
}

#[derive(Debug, Serialize)]
struct RepoEntry<'a> {
    repository: &'a str,
    path: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a RepoResult> for RepoEntry<'a> {
    fn from(result: &'a RepoResult) -> Self {
        Self {
            repository: &result.repository,
            path: result.local_path.display().to_string(),
            outcome: result.outcome.label(),
            error: match &result.outcome {
                Outcome::Failed(e) => Some(e.to_string()),
                _ => None,
            },
        }
    }
}

fn write_report(report: &SyncReport, writer: &OutputWriter) -> Result<()> {
    let summary = report.summary();

    if writer.is_json() {
        writer.write_json(&RunReport {
            summary,
            repositories: report.results.iter().map(RepoEntry::from).collect(),
            listing_failures: &report.listing_failures,
            interrupted: report.interrupted,
        })?;
        write_failures(report);
        return Ok(());
    }

    let line = format!(
        "{} cloned, {} refreshed, {} skipped, {} failed",
        summary.cloned, summary.refreshed, summary.skipped, summary.failed
    );
    if writer.color_enabled() {
        println!("\n{} {}", style("Done:").bold(), line);
    } else {
        println!("\nDone: {}", line);
    }

    if report.interrupted {
        writer.write_warning("Interrupted, remaining repositories were not attempted.");
    }

    write_failures(report);
    Ok(())
}

/// Failure summary on stderr, in text and JSON mode alike.
fn write_failures(report: &SyncReport) {
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        eprintln!("\nFailed repositories:");
        for (result, error) in failures {
            eprintln!("  {} ({}): {}", result.repository, result.local_path.display(), error);
        }
    }

    if !report.listing_failures.is_empty() {
        eprintln!("\nWorkspaces that could not be listed:");
        for failure in &report.listing_failures {
            eprintln!("  {}: {}", failure.workspace, failure.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloneDefaults;

    fn config(defaults: CloneDefaults) -> Config {
        Config { clone: defaults }
    }

    #[test]
    fn test_resolve_defaults() {
        let options = CloneArgs::default().resolve(&Config::default());

        assert_eq!(options.base_folder, PathBuf::from("."));
        assert_eq!(options.mode, SyncMode::Recreate);
        assert_eq!(options.auth_mode, AuthMode::Https);
        assert!(!options.project_folders);
        assert_eq!(options.jobs, 1);
    }

    #[test]
    fn test_resolve_uses_config_when_flags_absent() {
        let config = config(CloneDefaults {
            base_folder: Some(PathBuf::from("/srv/mirror")),
            auth_mode: Some(AuthMode::Ssh),
            mode: Some(SyncMode::Refresh),
            project_folders: Some(true),
            jobs: Some(4),
            workspaces: vec![],
        });

        let options = CloneArgs::default().resolve(&config);

        assert_eq!(options.base_folder, PathBuf::from("/srv/mirror"));
        assert_eq!(options.mode, SyncMode::Refresh);
        assert_eq!(options.auth_mode, AuthMode::Ssh);
        assert!(options.project_folders);
        assert_eq!(options.jobs, 4);
    }

    #[test]
    fn test_resolve_flags_win() {
        let config = config(CloneDefaults {
            base_folder: Some(PathBuf::from("/srv/mirror")),
            auth_mode: Some(AuthMode::Ssh),
            mode: Some(SyncMode::Refresh),
            jobs: Some(0),
            ..Default::default()
        });
        let args = CloneArgs {
            skip_existing: true,
            base_folder: Some(PathBuf::from("here")),
            auth_mode: Some(AuthMode::Https),
            ..Default::default()
        };

        let options = args.resolve(&config);

        assert_eq!(options.base_folder, PathBuf::from("here"));
        assert_eq!(options.mode, SyncMode::SkipExisting);
        assert_eq!(options.auth_mode, AuthMode::Https);
        // A configured zero still yields one worker.
        assert_eq!(options.jobs, 1);
    }

    #[test]
    fn test_json_entry_carries_error() {
        let result = RepoResult {
            repository: "ws/api".into(),
            local_path: PathBuf::from("base/ws/api"),
            outcome: Outcome::Failed(crate::sync::SyncError::Interrupted),
        };

        let value = serde_json::to_value(RepoEntry::from(&result)).unwrap();
        assert_eq!(value["outcome"], "failed");
        assert_eq!(value["error"], "not attempted, the run was interrupted");
    }
}
