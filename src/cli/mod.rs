//
//  bucket-cloner
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros
//!
//! Options are global so they may be given before or after the command,
//! e.g. `bucketcloner -e me@example.com -t TOKEN -w team clone`.

mod clone;
mod completion;
mod project;
mod workspace;

pub use clone::{CloneArgs, CloneCommand};
pub use completion::CompletionCommand;
pub use project::ProjectCommand;
pub use workspace::WorkspaceCommand;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::BitbucketClient;
use crate::auth::Credentials;
use crate::config::Config;
use crate::selector::parse_slugs;

/// Bucket Cloner - clone all your Bitbucket Cloud repositories
#[derive(Parser, Debug)]
#[command(
    name = "bucketcloner",
    version,
    about = "Clone every repository of your Bitbucket Cloud workspaces",
    long_about = "bucketcloner lists the workspaces and repositories your account can access \
                  and clones them into <base-folder>/<workspace>/<repo> with the system git client.",
    propagate_version = true,
    after_help = "Use 'bucketcloner <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten, next_help_heading = "Clone options")]
    pub clone: CloneArgs,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Atlassian account email
    #[arg(long, short = 'e', global = true, env = "BITBUCKET_EMAIL")]
    pub email: Option<String>,

    /// Bitbucket API token
    #[arg(long, short = 't', global = true, env = "BITBUCKET_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Workspace slug(s), separated by comma (default: all accessible)
    #[arg(long, short = 'w', global = true, env = "BUCKETCLONER_WORKSPACES")]
    pub workspace: Option<String>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: platform config dir)
    #[arg(long, global = true, env = "BUCKETCLONER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bitbucket API root
    #[arg(long, global = true, hide = true, env = "BUCKETCLONER_API_URL")]
    pub api_url: Option<String>,
}

impl GlobalOptions {
    /// Credentials from `--email` / `--token` or their environment variables.
    pub fn credentials(&self) -> Result<Credentials> {
        let email = self
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .context("Account email required. Use --email or set BITBUCKET_EMAIL.")?;
        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("API token required. Use --token or set BITBUCKET_API_TOKEN.")?;

        Ok(Credentials::new(email.trim(), token.trim()))
    }

    /// Authenticated API client.
    pub fn client(&self, credentials: Credentials) -> Result<BitbucketClient> {
        let client = match &self.api_url {
            Some(url) => BitbucketClient::with_base_url(url)?,
            None => BitbucketClient::cloud()?,
        };
        Ok(client.with_auth(credentials))
    }

    /// Configuration from `--config`, or the default location if present.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    /// Workspaces requested with `-w`, falling back to the configured list.
    pub fn requested_workspaces(&self, config: &Config) -> Vec<String> {
        match &self.workspace {
            Some(value) => parse_slugs(value),
            None => config.clone.workspaces.clone(),
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the workspaces your account can access
    #[command(visible_alias = "ws")]
    Workspace(WorkspaceCommand),

    /// List the projects of the selected workspaces
    Project(ProjectCommand),

    /// Clone or update every repository of the selected workspaces
    Clone(CloneCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_options_before_command() {
        let cli = Cli::try_parse_from([
            "bucketcloner",
            "-e",
            "me@example.com",
            "-t",
            "tok",
            "-w",
            "a,b",
            "--skip-existing",
            "clone",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Clone(_)));
        assert_eq!(cli.global.email.as_deref(), Some("me@example.com"));
        assert_eq!(cli.global.workspace.as_deref(), Some("a,b"));
        assert!(cli.clone.skip_existing);
    }

    #[test]
    fn test_options_after_command() {
        let cli = Cli::try_parse_from([
            "bucketcloner",
            "clone",
            "--refresh",
            "--auth-mode",
            "ssh",
            "--base-folder",
            "/tmp/x",
        ])
        .unwrap();

        assert!(cli.clone.refresh);
        assert_eq!(cli.clone.auth_mode, Some(crate::auth::AuthMode::Ssh));
        assert_eq!(cli.clone.base_folder, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_skip_existing_conflicts_with_refresh() {
        let result = Cli::try_parse_from(["bucketcloner", "--skip-existing", "--refresh", "clone"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["bucketcloner"]).is_err());
        assert!(Cli::try_parse_from(["bucketcloner", "false command"]).is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let global = GlobalOptions {
            email: Some("me@example.com".into()),
            ..Default::default()
        };
        let err = global.credentials().unwrap_err();
        assert!(err.to_string().contains("API token required"));
    }

    #[test]
    fn test_requested_workspaces_fallback() {
        let mut config = Config::default();
        config.clone.workspaces = vec!["from-config".into()];

        let none = GlobalOptions::default();
        assert_eq!(none.requested_workspaces(&config), vec!["from-config"]);

        let flag = GlobalOptions {
            workspace: Some("x, y".into()),
            ..Default::default()
        };
        assert_eq!(flag.requested_workspaces(&config), vec!["x", "y"]);
    }
}
