//
//  bucket-cloner
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! Shared types used by every Bitbucket Cloud listing endpoint: the error
//! taxonomy, HATEOAS links, and the pagination machinery.
//!
//! # Example
//!
//! ```rust
//! use bucket_cloner::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::Authentication(msg)) => println!("Check your credentials: {}", msg),
//!         Err(ApiError::NotFound(resource)) => println!("Resource not found: {}", resource),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for Bitbucket API operations.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `Authentication` | Invalid credentials or insufficient scopes | 401, 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `Transient` | Server or network failure, already retried | 5xx, N/A |
/// | `UnexpectedResponse` | Anything else, including undecodable bodies | other |
///
/// # Notes
///
/// - Only `Transient` errors are retried by the client
/// - Error messages are extracted from Bitbucket's JSON error body when possible
#[derive(Error, Debug)]
pub enum ApiError {
    /// The credentials were rejected or lack the required scopes.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested resource was not found.
    ///
    /// For workspace-scoped listings this usually means the slug is wrong
    /// or the account has no access to it.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A server-side (5xx) or network failure that persisted after retrying.
    #[error("Temporary failure talking to Bitbucket: {0}")]
    Transient(String),

    /// Any other response the client does not know how to handle.
    #[error("Unexpected response from Bitbucket: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    /// Whether the request that produced this error may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::UnexpectedResponse(err.to_string())
        } else {
            Self::Transient(err.to_string())
        }
    }
}

/// HATEOAS-style link for API resource navigation.
///
/// Bitbucket embeds these under `links`; clone links carry a `name`
/// (`https` or `ssh`) that identifies the protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// The URL of the linked resource.
    pub href: String,

    /// Optional descriptive name for the link.
    #[serde(default)]
    pub name: Option<String>,
}
