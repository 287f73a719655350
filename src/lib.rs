//
//  bucket-cloner
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bucket Cloner Library
//!
//! Backs the `bucketcloner` tool, which clones every repository of one or
//! more Bitbucket Cloud workspaces into a local folder tree.
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: Bitbucket Cloud REST client with lazy pagination
//! - [`auth`]: Account credentials and authenticated clone URLs
//! - [`selector`]: Workspace selection from a comma-separated list
//! - [`sync`]: Clone orchestration on top of the system `git`
//! - [`config`]: Optional defaults file
//! - [`output`]: Text and JSON output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bucket_cloner::api::BitbucketClient;
//! use bucket_cloner::auth::Credentials;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BitbucketClient::cloud()?
//!     .with_auth(Credentials::new("me@example.com", "api-token"));
//!
//! let mut workspaces = client.list_workspaces();
//! while let Some(ws) = workspaces.next().await? {
//!     println!("{}", ws);
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// Bitbucket Cloud API client.
///
/// Handles authentication, pagination, retries and maps HTTP failures to
/// [`api::ApiError`].
pub mod api;

/// Credentials and clone URL construction.
pub mod auth;

/// Configuration file management.
pub mod config;

/// Output formatting (text and JSON).
pub mod output;

/// Workspace selection.
pub mod selector;

/// Repository cloning and refreshing.
pub mod sync;

pub use cli::Cli;
pub use config::Config;

/// Application name, used for the binary and the configuration directory.
pub const APP_NAME: &str = "bucketcloner";

/// Application version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Example
///
/// ```rust,no_run
/// use bucket_cloner::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::PARTIAL_FAILURE);
/// ```
pub mod exit_codes {
    /// Every repository was handled.
    pub const SUCCESS: i32 = 0;

    /// Fatal error: invalid arguments, bad credentials, unknown workspace,
    /// unreachable API. Nothing was cloned.
    pub const ERROR: i32 = 1;

    /// The run completed but at least one repository or workspace listing
    /// failed, or it was interrupted.
    pub const PARTIAL_FAILURE: i32 = 2;

    /// A second Ctrl+C stopped the process immediately.
    pub const INTERRUPTED: i32 = 130;
}
