//
//  bucket-cloner
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Optional defaults for the `clone` command, read from a TOML file.
//! Command-line flags and environment variables always win over the file.
//! Credentials are never read from or written to it.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bucketcloner/config.toml`
//! - **macOS**: `~/Library/Application Support/bucketcloner/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bucketcloner\config\config.toml`
//!
//! A different file can be given with `--config`.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [clone]
//! base_folder = "/srv/bitbucket-mirror"
//! auth_mode = "ssh"
//! mode = "refresh"
//! project_folders = true
//! jobs = 4
//! workspaces = ["team-a", "team-b"]
//! ```

mod file;

pub use file::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::AuthMode;
use crate::sync::SyncMode;

/// Configuration file contents.
///
/// Every field is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub clone: CloneDefaults,
}

/// Defaults for the `clone` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloneDefaults {
    /// Folder the workspace directories are created in.
    #[serde(default)]
    pub base_folder: Option<PathBuf>,

    /// Clone protocol.
    #[serde(default)]
    pub auth_mode: Option<AuthMode>,

    /// Handling of existing checkouts.
    #[serde(default)]
    pub mode: Option<SyncMode>,

    /// Group repositories by project inside each workspace folder.
    #[serde(default)]
    pub project_folders: Option<bool>,

    /// Number of repositories processed in parallel.
    #[serde(default)]
    pub jobs: Option<usize>,

    /// Workspaces cloned when `-w` is not given.
    #[serde(default)]
    pub workspaces: Vec<String>,
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// Returns the default configuration when no file exists.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if config_exists(&path) => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads the configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_config_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parses TOML configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default configuration file path, if a home directory can be resolved.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
