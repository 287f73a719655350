//
//  bucket-cloner
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! HTTP client for the Bitbucket Cloud REST API 2.0, limited to the listing
//! endpoints the cloner needs: workspaces, projects and repositories.
//!
//! ## Architecture
//!
//! - [`client`]: Core HTTP client with authentication, retry and status mapping
//! - [`cloud`]: Wire types for Cloud resources and their conversion into records
//! - [`common`]: Shared types (pagination, errors, links)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bucket_cloner::api::BitbucketClient;
//! use bucket_cloner::auth::Credentials;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BitbucketClient::cloud()?
//!     .with_auth(Credentials::new("me@example.com", "ATATT..."));
//!
//! let mut workspaces = client.list_workspaces();
//! while let Some(ws) = workspaces.next().await? {
//!     println!("{} ({})", ws.name, ws.slug);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! API errors are returned as [`ApiError`] variants:
//!
//! - `Authentication`: 401 Unauthorized / 403 Forbidden
//! - `NotFound`: 404 Not Found
//! - `Transient`: 5xx and network failures, after one retry
//! - `UnexpectedResponse`: everything else

/// Core HTTP client wrapper for the Bitbucket API.
///
/// Provides the [`BitbucketClient`] struct which handles:
/// - Basic auth header injection
/// - Status code mapping and a single bounded retry
/// - Lazy pagination through [`Pages`](common::Pages)
pub mod client;

/// Bitbucket Cloud API v2.0 wire types.
pub mod cloud;

/// Common types shared by every endpoint.
///
/// Includes:
/// - [`ApiError`]: Standardized error types
/// - [`PaginatedResponse`](common::PaginatedResponse): Cloud pagination format
/// - [`Pages`](common::Pages): Lazy item sequence over paginated responses
/// - [`Link`](common::Link): HATEOAS link type
pub mod common;

pub use client::{format_api_error, BitbucketClient, CLOUD_API_URL};

pub use common::{ApiError, Pages};
