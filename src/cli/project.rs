//
//  bucket-cloner
//  cli/project.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project listing
//!
//! Lists the projects of the workspaces selected with `-w`, or of every
//! accessible workspace.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;

use crate::api::cloud::Project;
use crate::output::{OutputWriter, TextOutput};
use crate::selector;

use super::GlobalOptions;

/// List the projects of the selected workspaces
#[derive(Args, Debug)]
pub struct ProjectCommand {}

/// `--json` shape: one entry per workspace.
#[derive(Debug, Serialize)]
struct WorkspaceProjects {
    workspace: String,
    projects: Vec<Project>,
}

impl ProjectCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let client = global.client(global.credentials()?)?;
        let writer = OutputWriter::from_json_flag(global.json);

        let all = client
            .list_workspaces()
            .collect_all()
            .await
            .context("Failed to list workspaces")?;
        let selected = selector::select(all, &global.requested_workspaces(&config))?;

        let mut listing = Vec::with_capacity(selected.len());
        for workspace in selected {
            let projects = client
                .list_projects(&workspace.slug)
                .collect_all()
                .await
                .with_context(|| format!("Failed to list projects of workspace '{}'", workspace.slug))?;

            if !writer.is_json() {
                print_workspace(&workspace.slug, &projects, writer.color_enabled());
            }
            listing.push(WorkspaceProjects {
                workspace: workspace.slug,
                projects,
            });
        }

        if writer.is_json() {
            writer.write_json(&listing)?;
        }
        Ok(())
    }
}

fn print_workspace(slug: &str, projects: &[Project], color: bool) {
    if color {
        println!("Projects in workspace {}:", style(slug).bold());
    } else {
        println!("Projects in workspace {}:", slug);
    }

    if projects.is_empty() {
        println!("  No projects found.");
    }
    for project in projects {
        println!("{}", project.to_text(color));
    }
}
