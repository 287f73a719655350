//
//  bucket-cloner
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Cloud repository types.
//!
//! The repository listing returns a lot more than the cloner needs. The
//! [`RepositoryPayload`] wire type keeps only the fields used to place and
//! clone a repository, and is flattened into a [`Repository`] record.
//!
//! # Notes
//!
//! - Clone links are found under `links.clone[]`, keyed by `name` (`https`, `ssh`)
//! - The `full_name` field follows the format `{workspace}/{repo_slug}`

use serde::{Deserialize, Serialize};

use crate::api::common::{Link, PageItem};

/// A repository to be cloned, unique by `(workspace_slug, slug)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// URL-safe identifier, also used as the local directory name.
    pub slug: String,

    /// Human-readable name.
    pub name: String,

    /// Slug of the owning workspace.
    pub workspace_slug: String,

    /// Key of the project the repository belongs to, if any.
    pub project_key: Option<String>,

    /// HTTPS clone link, without credentials embedded.
    pub clone_url_https: Option<String>,

    /// SSH clone link.
    pub clone_url_ssh: Option<String>,

    /// Version control system, `git` for every current Cloud repository.
    pub scm: String,
}

impl Repository {
    /// `{workspace}/{slug}`, used to identify the repository in output.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.workspace_slug, self.slug)
    }

    /// Whether the repository can be handled by the git client.
    pub fn is_git(&self) -> bool {
        self.scm.eq_ignore_ascii_case("git")
    }
}

/// Repository object as returned by `/repositories/{workspace}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub slug: String,

    pub name: String,

    /// `{workspace_slug}/{repo_slug}`.
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default = "default_scm")]
    pub scm: String,

    #[serde(default)]
    pub workspace: Option<WorkspaceSlug>,

    #[serde(default)]
    pub project: Option<ProjectKey>,

    #[serde(default)]
    pub links: RepositoryLinks,
}

fn default_scm() -> String {
    "git".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSlug {
    pub slug: String,
}

/// Project reference embedded in a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectKey {
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryLinks {
    #[serde(default)]
    pub clone: Vec<Link>,
}

impl RepositoryLinks {
    /// Returns the clone link with the given protocol name.
    pub fn clone_link(&self, name: &str) -> Option<&str> {
        self.clone
            .iter()
            .find(|l| l.name.as_deref() == Some(name))
            .map(|l| l.href.as_str())
    }
}

impl PageItem for Repository {
    type Wire = RepositoryPayload;

    fn from_wire(wire: RepositoryPayload) -> Self {
        let workspace_slug = wire
            .workspace
            .map(|w| w.slug)
            .or_else(|| {
                wire.full_name
                    .as_deref()
                    .and_then(|f| f.split_once('/'))
                    .map(|(ws, _)| ws.to_string())
            })
            .unwrap_or_default();

        Self {
            clone_url_https: wire.links.clone_link("https").map(str::to_string),
            clone_url_ssh: wire.links.clone_link("ssh").map(str::to_string),
            slug: wire.slug,
            name: wire.name,
            workspace_slug,
            project_key: wire.project.map(|p| p.key),
            scm: wire.scm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> Repository {
        Repository::from_wire(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_repository_from_listing() {
        let repo = payload(
            r#"{
                "type": "repository",
                "slug": "api-gateway",
                "name": "API Gateway",
                "full_name": "acme/api-gateway",
                "scm": "git",
                "is_private": true,
                "workspace": {"slug": "acme", "name": "Acme"},
                "project": {"key": "CORE", "name": "Core"},
                "links": {
                    "clone": [
                        {"name": "https", "href": "https://user@bitbucket.org/acme/api-gateway.git"},
                        {"name": "ssh", "href": "git@bitbucket.org:acme/api-gateway.git"}
                    ]
                }
            }"#,
        );

        assert_eq!(repo.slug, "api-gateway");
        assert_eq!(repo.workspace_slug, "acme");
        assert_eq!(repo.project_key.as_deref(), Some("CORE"));
        assert_eq!(
            repo.clone_url_https.as_deref(),
            Some("https://user@bitbucket.org/acme/api-gateway.git")
        );
        assert_eq!(
            repo.clone_url_ssh.as_deref(),
            Some("git@bitbucket.org:acme/api-gateway.git")
        );
        assert_eq!(repo.full_name(), "acme/api-gateway");
        assert!(repo.is_git());
    }

    #[test]
    fn test_missing_links_and_project() {
        let repo = payload(r#"{"slug": "legacy", "name": "legacy", "full_name": "acme/legacy", "scm": "hg"}"#);

        assert_eq!(repo.workspace_slug, "acme");
        assert_eq!(repo.project_key, None);
        assert_eq!(repo.clone_url_https, None);
        assert_eq!(repo.clone_url_ssh, None);
        assert!(!repo.is_git());
    }
}
