//
//  bucket-cloner
//  cli/workspace.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Workspace listing
//!
//! Prints every workspace the account can access, one per line:
//! `name (slug) - url`.

use anyhow::{Context, Result};
use clap::Args;

use crate::output::OutputWriter;

use super::GlobalOptions;

/// List the workspaces your account can access
#[derive(Args, Debug)]
pub struct WorkspaceCommand {}

impl WorkspaceCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.client(global.credentials()?)?;
        let writer = OutputWriter::from_json_flag(global.json);

        let workspaces = client
            .list_workspaces()
            .collect_all()
            .await
            .context("Failed to list workspaces")?;
        tracing::debug!(count = workspaces.len(), "listed workspaces");

        if workspaces.is_empty() && !writer.is_json() {
            println!("No workspaces found.");
            return Ok(());
        }

        writer.write_list(&workspaces)
    }
}
