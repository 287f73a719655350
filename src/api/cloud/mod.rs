//
//  bucket-cloner
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 types.
//!
//! Each resource has a wire type (`*Payload`) mirroring the JSON the API
//! returns, and a flat record the rest of the crate works with. The
//! conversion happens through [`PageItem`](crate::api::common::PageItem)
//! while paginating.
//!
//! - [`repositories`] - Repository records and clone links
//! - [`workspaces`] - Workspace and project records
//!
//! # Notes
//!
//! - Pagination uses absolute `next` links
//! - Repository slugs are URL-safe versions of repository names

pub mod repositories;
pub mod workspaces;

pub use repositories::Repository;
pub use workspaces::{Project, Workspace};
