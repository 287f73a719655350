//
//  bucket-cloner
//  sync/report.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Per-run results and the end-of-run summary.

use std::path::PathBuf;

use serde::Serialize;

use super::{Outcome, SyncError};

/// The result of processing one repository.
#[derive(Debug)]
pub struct RepoResult {
    /// `{workspace}/{slug}`.
    pub repository: String,
    pub local_path: PathBuf,
    pub outcome: Outcome,
}

impl RepoResult {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

/// A repository listing that could not be completed.
#[derive(Debug, Clone, Serialize)]
pub struct ListingFailure {
    pub workspace: String,
    pub reason: String,
}

/// Everything that happened during a clone run, in listing order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub results: Vec<RepoResult>,
    pub listing_failures: Vec<ListingFailure>,
    pub interrupted: bool,
}

/// Outcome counts, also the `--json` shape of the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub cloned: usize,
    pub refreshed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for result in &self.results {
            match result.outcome {
                Outcome::Cloned => summary.cloned += 1,
                Outcome::Refreshed => summary.refreshed += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Repositories that failed, with their reason.
    pub fn failures(&self) -> impl Iterator<Item = (&RepoResult, &SyncError)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed(e) => Some((r, e)),
            _ => None,
        })
    }

    /// `true` when every repository was handled and every listing succeeded.
    pub fn is_success(&self) -> bool {
        !self.interrupted
            && self.listing_failures.is_empty()
            && !self.results.iter().any(RepoResult::is_failure)
    }
}
