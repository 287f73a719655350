//
//  bucket-cloner
//  api/cloud/workspaces.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud workspace and project types.
//!
//! Workspaces are the top-level organizational unit in Bitbucket Cloud.
//! Projects optionally group the repositories of a workspace.
//!
//! # Workspace Hierarchy
//!
//! ```text
//! Workspace
//! ├── Projects (optional grouping)
//! │   └── Repositories
//! └── Repositories (not in projects)
//! ```
//!
//! # Notes
//!
//! - Workspace slugs are globally unique and URL-safe
//! - Project keys are unique within their workspace

use serde::{Deserialize, Serialize};

use crate::api::common::PageItem;

/// A Bitbucket Cloud workspace the account has access to.
///
/// Unique by `slug`. Sourced entirely from the API and never mutated.
///
/// # Example
///
/// ```rust
/// use bucket_cloner::api::cloud::Workspace;
///
/// let ws = Workspace {
///     slug: "my-team".to_string(),
///     name: "My Team".to_string(),
///     url: Some("https://bitbucket.org/my-team/".to_string()),
/// };
/// assert_eq!(ws.to_string(), "My Team (my-team) - https://bitbucket.org/my-team/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// URL-safe identifier used in API paths and repository URLs.
    pub slug: String,

    /// Human-readable name of the workspace.
    pub name: String,

    /// Web URL of the workspace, when the API links one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl std::fmt::Display for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.slug)?;
        if let Some(url) = &self.url {
            write!(f, " - {}", url)?;
        }
        Ok(())
    }
}

/// Workspace membership as returned by `/user/permissions/workspaces`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspacePermission {
    /// Role of the account in the workspace (`owner`, `collaborator`, `member`).
    #[serde(default)]
    pub permission: Option<String>,

    pub workspace: WorkspacePayload,
}

/// Workspace object as embedded in API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspacePayload {
    pub slug: String,

    pub name: String,

    #[serde(default)]
    pub links: Option<HtmlLinks>,
}

/// The `links` object of resources that only matter for their web URL.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlLinks {
    #[serde(default)]
    pub html: Option<crate::api::common::Link>,
}

impl HtmlLinks {
    fn html_href(links: Option<Self>) -> Option<String> {
        links.and_then(|l| l.html).map(|l| l.href)
    }
}

impl PageItem for Workspace {
    type Wire = WorkspacePermission;

    fn from_wire(wire: WorkspacePermission) -> Self {
        let ws = wire.workspace;
        Self {
            slug: ws.slug,
            name: ws.name,
            url: HtmlLinks::html_href(ws.links),
        }
    }
}

/// A project inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    /// Short project key, e.g. `CORE`.
    pub key: String,

    /// Human-readable project name.
    pub name: String,

    /// Web URL of the project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.key)?;
        if let Some(url) = &self.url {
            write!(f, " - {}", url)?;
        }
        Ok(())
    }
}

/// Project object as returned by `/workspaces/{workspace}/projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectPayload {
    pub key: String,

    pub name: String,

    #[serde(default)]
    pub links: Option<HtmlLinks>,
}

impl PageItem for Project {
    type Wire = ProjectPayload;

    fn from_wire(wire: ProjectPayload) -> Self {
        Self {
            key: wire.key,
            name: wire.name,
            url: HtmlLinks::html_href(wire.links),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_from_permission() {
        let json = r#"{
            "type": "workspace_membership",
            "permission": "owner",
            "workspace": {
                "type": "workspace",
                "uuid": "{1234}",
                "slug": "acme",
                "name": "Acme Inc",
                "links": {"html": {"href": "https://bitbucket.org/acme/"}}
            }
        }"#;
        let wire: WorkspacePermission = serde_json::from_str(json).unwrap();
        let ws = Workspace::from_wire(wire);

        assert_eq!(ws.slug, "acme");
        assert_eq!(ws.name, "Acme Inc");
        assert_eq!(ws.url.as_deref(), Some("https://bitbucket.org/acme/"));
    }

    #[test]
    fn test_workspace_display_without_url() {
        let ws = Workspace {
            slug: "acme".into(),
            name: "Acme".into(),
            url: None,
        };
        assert_eq!(ws.to_string(), "Acme (acme)");
    }

    #[test]
    fn test_project_from_payload() {
        let json = r#"{"key": "CORE", "name": "Core services", "links": {}}"#;
        let project = Project::from_wire(serde_json::from_str(json).unwrap());

        assert_eq!(project.key, "CORE");
        assert_eq!(project.url, None);
        assert_eq!(project.to_string(), "Core services (CORE)");
    }
}
