//
//  bucket-cloner
//  sync/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Clone Orchestrator
//!
//! Decides, for every listed repository, whether to clone, skip or pull,
//! and runs the version-control client accordingly.
//!
//! ## Target Layout
//!
//! ```text
//! <base>/<workspace>/<repo>             (default)
//! <base>/<workspace>/<project>/<repo>   (--project-folders, repo has a project)
//! ```
//!
//! ## Modes
//!
//! | Mode | Target absent | Target present |
//! |------|---------------|----------------|
//! | `recreate` | clone | clone again, then replace |
//! | `skip-existing` | clone | leave untouched |
//! | `refresh` | clone | `git pull` |
//!
//! ## Atomicity
//!
//! Clones are made in a hidden staging directory next to the target
//! (`.<slug>.XXXXXX.partial`) and renamed into place once git succeeded.
//! In `recreate` mode the previous checkout is first renamed into that
//! staging directory and deleted along with it, so the target is always
//! either the complete old checkout or the complete new clone. Staging
//! directories left by a killed run are removed before the next clone of
//! the same repository.
//!
//! ## Credentials on disk
//!
//! HTTPS clones use the token-carrying URL, then reset `origin` to the
//! plain link before the checkout is moved into place. Pulls pass the
//! token as a per-invocation `Authorization` header.
//!
//! ## Failures
//!
//! A failing repository is recorded in the [`SyncReport`] and the run moves
//! on; nothing short of an interrupt stops the remaining repositories.

mod git;
mod report;

pub use git::*;
pub use report::*;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;

use crate::api::cloud::Repository;
use crate::auth::{public_url, AuthMode, CloneUrlError, Credentials};

const STAGING_SUFFIX: &str = ".partial";
const STAGING_RAND_LEN: usize = 6;

/// What to do with a repository whose target directory already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Replace the existing directory with a fresh clone.
    #[default]
    Recreate,
    /// Leave the existing directory untouched.
    SkipExisting,
    /// Pull the latest changes into the existing directory.
    Refresh,
}

/// Settings shared by every repository of a run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub base_folder: PathBuf,
    pub mode: SyncMode,
    pub auth_mode: AuthMode,
    pub project_folders: bool,
    /// Maximum number of repositories processed at once (at least 1).
    pub jobs: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            base_folder: PathBuf::from("."),
            mode: SyncMode::default(),
            auth_mode: AuthMode::default(),
            project_folders: false,
            jobs: 1,
        }
    }
}

/// A repository together with the directory it is cloned into.
#[derive(Debug, Clone)]
pub struct CloneTarget {
    pub local_path: PathBuf,
    pub repository: Repository,
}

impl CloneTarget {
    pub fn new(repository: Repository, base_folder: &Path, project_folders: bool) -> Self {
        let mut local_path = base_folder.join(&repository.workspace_slug);
        if project_folders {
            if let Some(key) = &repository.project_key {
                local_path.push(key);
            }
        }
        local_path.push(&repository.slug);

        Self {
            local_path,
            repository,
        }
    }
}

/// Result of syncing a single repository.
#[derive(Debug)]
pub enum Outcome {
    Cloned,
    Skipped,
    Refreshed,
    Failed(SyncError),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cloned => "cloned",
            Self::Skipped => "skipped",
            Self::Refreshed => "refreshed",
            Self::Failed(_) => "failed",
        }
    }
}

/// Why a single repository could not be synced.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The git process could not be started or exited unsuccessfully.
    #[error("git {operation} failed ({status}): {message}")]
    VcsInvocation {
        operation: &'static str,
        status: String,
        message: String,
    },

    #[error("cannot {action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("repository has no {0} clone link")]
    MissingCloneUrl(AuthMode),

    #[error(transparent)]
    InvalidCloneUrl(#[from] CloneUrlError),

    /// Another repository of the same run maps onto this directory.
    #[error("{} is already used by another repository in this run", .0.display())]
    DuplicateTarget(PathBuf),

    #[error("not attempted, the run was interrupted")]
    Interrupted,

    #[error("worker stopped unexpectedly: {0}")]
    Aborted(String),
}

impl SyncError {
    fn filesystem(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Filesystem {
            action,
            path,
            source,
        }
    }

    /// Strips the API token from messages that may echo the clone URL.
    fn redacted(self, credentials: &Credentials) -> Self {
        match self {
            Self::VcsInvocation {
                operation,
                status,
                message,
            } => Self::VcsInvocation {
                operation,
                status,
                message: credentials.redact(&message),
            },
            other => other,
        }
    }
}

/// Shared interrupt flag.
///
/// Once set, no new repository is started; those already running finish.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Sets the flag on the first Ctrl-C; a second one exits immediately.
    ///
    /// Exiting skips cleanup, so clones in flight leave their
    /// `.<slug>.XXXXXX.partial` staging directories behind. The next run
    /// cloning the same repository removes them.
    pub fn cancel_on_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            tracing::warn!("interrupt received, finishing running clones");
            flag.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(crate::exit_codes::INTERRUPTED);
            }
        });
    }
}

/// Receives progress while a run is in flight.
///
/// Both callbacks are invoked from the task driving [`Orchestrator::run`],
/// so implementations need not be thread-safe.
pub trait SyncObserver {
    fn started(&mut self, _target: &CloneTarget) {}

    fn finished(&mut self, _result: &RepoResult) {}
}

impl SyncObserver for () {}

/// Syncs repositories to disk.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use bucket_cloner::auth::Credentials;
/// use bucket_cloner::sync::{CancelFlag, GitCli, Orchestrator, SyncOptions};
///
/// # async fn example(repos: Vec<bucket_cloner::api::cloud::Repository>) {
/// let orchestrator = Orchestrator::new(
///     Arc::new(GitCli::new()),
///     Credentials::new("me@example.com", "token"),
///     SyncOptions::default(),
/// );
/// let report = orchestrator.run(repos, &CancelFlag::new(), &mut ()).await;
/// println!("{:?}", report.summary());
/// # }
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    vcs: Arc<dyn Vcs>,
    credentials: Credentials,
    options: SyncOptions,
}

impl Orchestrator {
    pub fn new(vcs: Arc<dyn Vcs>, credentials: Credentials, options: SyncOptions) -> Self {
        Self {
            vcs,
            credentials,
            options,
        }
    }

    /// Computes where a repository goes on disk.
    pub fn target(&self, repository: Repository) -> CloneTarget {
        CloneTarget::new(repository, &self.options.base_folder, self.options.project_folders)
    }

    /// Processes every repository, at most `jobs` at a time.
    ///
    /// Results are returned in the order of `repositories`, whatever order
    /// the workers finish in.
    pub async fn run(
        &self,
        repositories: Vec<Repository>,
        cancel: &CancelFlag,
        observer: &mut dyn SyncObserver,
    ) -> SyncReport {
        let jobs = self.options.jobs.max(1);
        let mut slots: Vec<Option<RepoResult>> = Vec::with_capacity(repositories.len());
        let mut identities: Vec<(String, PathBuf)> = Vec::with_capacity(repositories.len());
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut workers: JoinSet<(usize, RepoResult)> = JoinSet::new();

        for (index, repository) in repositories.into_iter().enumerate() {
            let target = self.target(repository);
            identities.push((target.repository.full_name(), target.local_path.clone()));
            slots.push(None);

            if !claimed.insert(target.local_path.clone()) {
                let result = failed(&target, SyncError::DuplicateTarget(target.local_path.clone()));
                observer.finished(&result);
                slots[index] = Some(result);
                continue;
            }

            while workers.len() >= jobs {
                if let Some(joined) = workers.join_next().await {
                    record(joined, &mut slots, observer);
                }
            }

            if cancel.is_cancelled() {
                let result = failed(&target, SyncError::Interrupted);
                observer.finished(&result);
                slots[index] = Some(result);
                continue;
            }

            observer.started(&target);
            let this = self.clone();
            workers.spawn(async move {
                let outcome = this.sync(&target).await;
                (
                    index,
                    RepoResult {
                        repository: target.repository.full_name(),
                        local_path: target.local_path,
                        outcome,
                    },
                )
            });
        }

        while let Some(joined) = workers.join_next().await {
            record(joined, &mut slots, observer);
        }

        let results = slots
            .into_iter()
            .zip(identities)
            .map(|(slot, (repository, local_path))| {
                slot.unwrap_or_else(|| RepoResult {
                    repository,
                    local_path,
                    outcome: Outcome::Failed(SyncError::Aborted("no result reported".to_string())),
                })
            })
            .collect();

        SyncReport {
            results,
            listing_failures: Vec::new(),
            interrupted: cancel.is_cancelled(),
        }
    }

    /// Syncs a single repository. Never panics on failure; errors are
    /// returned as [`Outcome::Failed`] with the token redacted.
    pub async fn sync(&self, target: &CloneTarget) -> Outcome {
        match self.try_sync(target).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed(e.redacted(&self.credentials)),
        }
    }

    async fn try_sync(&self, target: &CloneTarget) -> Result<Outcome, SyncError> {
        let repo = &target.repository;
        let path = &target.local_path;

        if !repo.is_git() {
            tracing::warn!(repository = %repo.full_name(), scm = %repo.scm, "skipping non-git repository");
            return Ok(Outcome::Skipped);
        }

        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(SyncError::filesystem("inspect", path))?;

        if exists {
            match self.options.mode {
                SyncMode::SkipExisting => {
                    tracing::debug!(path = %path.display(), "target exists, skipping");
                    return Ok(Outcome::Skipped);
                }
                SyncMode::Refresh => {
                    tracing::debug!(path = %path.display(), "target exists, pulling");
                    let header = match self.options.auth_mode {
                        AuthMode::Https => Some(self.credentials.git_auth_header()),
                        AuthMode::Ssh => None,
                    };
                    self.vcs.pull(path, header.as_deref()).await?;
                    return Ok(Outcome::Refreshed);
                }
                SyncMode::Recreate => {}
            }
        }

        let urls = self.clone_urls(repo)?;
        self.clone_into_place(&urls, target, exists).await?;
        Ok(Outcome::Cloned)
    }

    fn clone_urls(&self, repo: &Repository) -> Result<CloneUrls, SyncError> {
        let mode = self.options.auth_mode;
        let link = match mode {
            AuthMode::Https => repo.clone_url_https.as_deref(),
            AuthMode::Ssh => repo.clone_url_ssh.as_deref(),
        }
        .ok_or(SyncError::MissingCloneUrl(mode))?;

        Ok(CloneUrls {
            fetch: self.credentials.clone_url(mode, link)?,
            origin: public_url(mode, link)?,
        })
    }

    /// Clones into a staging directory beside `target`, then swaps it into place.
    async fn clone_into_place(
        &self,
        urls: &CloneUrls,
        target: &CloneTarget,
        replace: bool,
    ) -> Result<(), SyncError> {
        let path = &target.local_path;
        let slug = &target.repository.slug;
        let parent = path.parent().unwrap_or_else(|| Path::new("."));

        tokio::fs::create_dir_all(parent)
            .await
            .map_err(SyncError::filesystem("create", parent))?;
        sweep_stale_staging(parent, slug).await;

        // Removed on drop, so a failed clone leaves nothing behind.
        let staging = tempfile::Builder::new()
            .prefix(&staging_prefix(slug))
            .suffix(STAGING_SUFFIX)
            .rand_bytes(STAGING_RAND_LEN)
            .tempdir_in(parent)
            .map_err(SyncError::filesystem("create staging directory in", parent))?;
        let staged = staging.path().join("new");
        let previous = staging.path().join("old");

        tracing::debug!(repository = %target.repository.full_name(), staging = %staged.display(), "cloning");
        self.vcs.clone_repo(&urls.fetch, &staged).await?;
        if urls.fetch != urls.origin {
            self.vcs.set_remote_url(&staged, &urls.origin).await?;
        }

        if replace {
            tokio::fs::rename(path, &previous)
                .await
                .map_err(SyncError::filesystem("move aside", path))?;
        }

        if let Err(e) = tokio::fs::rename(&staged, path).await {
            if replace {
                if let Err(restore) = tokio::fs::rename(&previous, path).await {
                    let kept = staging.into_path();
                    tracing::error!(
                        path = %path.display(),
                        kept = %kept.join("old").display(),
                        error = %restore,
                        "could not restore previous checkout"
                    );
                }
            }
            return Err(SyncError::filesystem("move clone into", path)(e));
        }

        if let Err(e) = staging.close() {
            tracing::warn!(parent = %parent.display(), error = %e, "could not remove staging directory");
        }
        Ok(())
    }
}

/// URL git clones from, and URL recorded as `origin` in the checkout.
struct CloneUrls {
    fetch: String,
    origin: String,
}

fn staging_prefix(slug: &str) -> String {
    format!(".{}.", slug)
}

/// Removes staging directories of `slug` left in `parent` by a killed run.
async fn sweep_stale_staging(parent: &Path, slug: &str) {
    let Ok(mut entries) = tokio::fs::read_dir(parent).await else {
        return;
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        if !is_staging_name(&name.to_string_lossy(), slug) {
            continue;
        }

        let stale = entry.path();
        tracing::warn!(path = %stale.display(), "removing stale staging directory");
        if let Err(e) = tokio::fs::remove_dir_all(&stale).await {
            tracing::warn!(path = %stale.display(), error = %e, "could not remove stale staging directory");
        }
    }
}

fn is_staging_name(name: &str, slug: &str) -> bool {
    name.strip_prefix(&staging_prefix(slug))
        .and_then(|rest| rest.strip_suffix(STAGING_SUFFIX))
        .is_some_and(|random| {
            random.len() == STAGING_RAND_LEN && random.chars().all(|c| c.is_ascii_alphanumeric())
        })
}

fn failed(target: &CloneTarget, error: SyncError) -> RepoResult {
    RepoResult {
        repository: target.repository.full_name(),
        local_path: target.local_path.clone(),
        outcome: Outcome::Failed(error),
    }
}

fn record(
    joined: Result<(usize, RepoResult), tokio::task::JoinError>,
    slots: &mut [Option<RepoResult>],
    observer: &mut dyn SyncObserver,
) {
    match joined {
        Ok((index, result)) => {
            observer.finished(&result);
            slots[index] = Some(result);
        }
        // The slot stays empty and is reported as aborted.
        Err(e) => tracing::error!(error = %e, "clone worker failed"),
    }
}
