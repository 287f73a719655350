//
//  bucket-cloner
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination support for Bitbucket Cloud list endpoints.
//!
//! Bitbucket Cloud pages carry a `values` array and, while more results
//! exist, an absolute `next` URL. [`Pages`] walks those links lazily and
//! hands out one record at a time.
//!
//! ```text
//! GET /repositories/ws?pagelen=100      -> values[0..100], next=...&page=2
//! GET /repositories/ws?pagelen=100&page=2 -> values[0..17], (no next)
//! ```

use std::collections::VecDeque;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::ApiError;
use crate::api::client::BitbucketClient;

/// One page of a Bitbucket Cloud paginated response.
///
/// Only `values` and `next` are read; `page`, `pagelen`, `size` and
/// `previous` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Array of items in the current page. May be empty.
    pub values: Vec<T>,

    /// Absolute URL of the next page. `None` on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Checks if there are more pages of results available.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the URL for the next page of results.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }
}

/// A record that is decoded from a list endpoint's wire payload.
///
/// Listing endpoints return richer (or differently nested) JSON than the
/// records the cloner works with; `Wire` is the raw shape and
/// [`from_wire`](PageItem::from_wire) flattens it.
pub trait PageItem: Sized {
    /// The JSON shape of one element of `values`.
    type Wire: DeserializeOwned;

    fn from_wire(wire: Self::Wire) -> Self;
}

/// Lazy, finite, non-restartable sequence of records spread across pages.
///
/// The first page is fetched on the first call to [`next`](Pages::next);
/// every following page only once the previous one has been handed out
/// completely. Once exhausted (or after an error) the sequence stays empty.
///
/// # Example
///
/// ```rust,no_run
/// use bucket_cloner::api::BitbucketClient;
///
/// # async fn example(client: BitbucketClient) -> anyhow::Result<()> {
/// let mut repos = client.list_repositories("my-team", None);
/// while let Some(repo) = repos.next().await? {
///     println!("{}", repo.slug);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pages<'a, T: PageItem> {
    client: &'a BitbucketClient,
    next: Option<Url>,
    buffer: VecDeque<T>,
    pages_fetched: usize,
}

impl<'a, T: PageItem> Pages<'a, T> {
    pub(crate) fn new(client: &'a BitbucketClient, first: Url) -> Self {
        Self {
            client,
            next: Some(first),
            buffer: VecDeque::new(),
            pages_fetched: 0,
        }
    }

    /// Yields the next record, fetching the next page when needed.
    ///
    /// Returns `Ok(None)` once the last page has been drained.
    pub async fn next(&mut self) -> Result<Option<T>, ApiError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            // Taking the link up front makes a failed fetch terminal.
            let Some(url) = self.next.take() else {
                return Ok(None);
            };

            let page: PaginatedResponse<T::Wire> = self.client.get_url(url).await?;
            self.pages_fetched += 1;

            tracing::debug!(
                page = self.pages_fetched,
                items = page.values.len(),
                has_next = page.has_next(),
                "fetched page"
            );

            self.next = match page.next_url() {
                Some(next) => Some(Url::parse(next).map_err(|e| {
                    ApiError::UnexpectedResponse(format!("invalid next link '{}': {}", next, e))
                })?),
                None => None,
            };
            self.buffer
                .extend(page.values.into_iter().map(T::from_wire));
        }
    }

    /// Drains the remaining records into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Number of pages requested so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    #[cfg(test)]
    pub(crate) fn peek_next_url(&self) -> Option<&Url> {
        self.next.as_ref()
    }
}
