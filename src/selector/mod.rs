//
//  bucket-cloner
//  selector/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Workspace selection.
//!
//! Narrows the workspaces an account can access down to the ones requested
//! with `-w`, failing up front when a requested slug is not accessible so
//! that nothing is cloned for a mistyped workspace.

use thiserror::Error;

use crate::api::cloud::Workspace;

/// One or more requested workspaces are not accessible to the account.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown workspace(s): {}. Run the `workspace` command to see the accessible ones.", .missing.join(", "))]
pub struct UnknownWorkspaceError {
    /// Requested slugs that were not found, in request order.
    pub missing: Vec<String>,
}

/// Splits a comma-separated `-w` value into slugs.
///
/// Whitespace around slugs is trimmed, empty entries and repeats are dropped.
pub fn parse_slugs(value: &str) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::new();
    for slug in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !slugs.iter().any(|s| s == slug) {
            slugs.push(slug.to_string());
        }
    }
    slugs
}

/// Filters `all` down to the requested slugs.
///
/// With no requested slugs every workspace is returned unchanged. Otherwise
/// the matching workspaces are returned in the order of `all`.
///
/// # Errors
///
/// Returns [`UnknownWorkspaceError`] listing every requested slug that is
/// not among `all`.
///
/// # Example
///
/// ```rust
/// use bucket_cloner::api::cloud::Workspace;
/// use bucket_cloner::selector::select;
///
/// let ws = |slug: &str| Workspace { slug: slug.into(), name: slug.into(), url: None };
/// let all = vec![ws("a"), ws("b")];
///
/// assert_eq!(select(all.clone(), &[]).unwrap().len(), 2);
/// let err = select(all, &["a".to_string(), "c".to_string()]).unwrap_err();
/// assert_eq!(err.missing, vec!["c"]);
/// ```
pub fn select(all: Vec<Workspace>, requested: &[String]) -> Result<Vec<Workspace>, UnknownWorkspaceError> {
    if requested.is_empty() {
        return Ok(all);
    }

    let missing: Vec<String> = requested
        .iter()
        .filter(|slug| !all.iter().any(|ws| &ws.slug == *slug))
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(UnknownWorkspaceError { missing });
    }

    Ok(all
        .into_iter()
        .filter(|ws| requested.contains(&ws.slug))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws(slug: &str) -> Workspace {
        Workspace {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            url: None,
        }
    }

    fn slugs(list: &[Workspace]) -> Vec<&str> {
        list.iter().map(|w| w.slug.as_str()).collect()
    }

    #[test]
    fn test_parse_slugs() {
        assert_eq!(parse_slugs("workspace1"), vec!["workspace1"]);
        assert_eq!(
            parse_slugs("workspace1,workspace2,workspace3"),
            vec!["workspace1", "workspace2", "workspace3"]
        );
        assert_eq!(parse_slugs(" a , b,,a,"), vec!["a", "b"]);
        assert!(parse_slugs(" , ").is_empty());
    }

    #[test]
    fn test_no_request_passes_everything_through() {
        let all = vec![ws("a"), ws("b"), ws("c")];
        let selected = select(all.clone(), &[]).unwrap();
        assert_eq!(selected, all);
    }

    #[test]
    fn test_selection_keeps_listing_order() {
        let all = vec![ws("a"), ws("b"), ws("c")];
        let selected = select(all, &["c".into(), "a".into()]).unwrap();
        assert_eq!(slugs(&selected), vec!["a", "c"]);
    }

    #[test]
    fn test_unknown_workspace_is_reported() {
        let all = vec![ws("a")];
        let err = select(all, &["a".into(), "b".into(), "z".into()]).unwrap_err();
        assert_eq!(err.missing, vec!["b", "z"]);
        assert!(err.to_string().contains("b, z"));
    }
}
