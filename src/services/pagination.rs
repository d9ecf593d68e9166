// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paged collection fetching with a client-side filter.
//!
//! Strety cannot filter by completion status, so open items may be spread
//! over many pages. Pages are read in order until one of:
//! - the filtered result count reaches the limit
//! - the server reports no next page
//! - a page comes back empty
//! - `MAX_PAGES` pages have been read

use crate::error::AppError;
use crate::models::ListResponse;
use crate::services::strety::StretyClient;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;

/// Items requested per page.
pub const PAGE_SIZE: u32 = 20;

/// Hard ceiling on pages read by one collection.
pub const MAX_PAGES: u32 = 50;

/// Largest result set a caller may ask for.
pub const MAX_RESULTS: usize = 100;

/// Result count when the caller does not ask for one.
pub const DEFAULT_RESULTS: usize = 50;

/// Why a collection stopped reading pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    LimitReached,
    LastPage,
    EmptyPage,
    PageCeiling,
}

/// Clamp a caller-supplied result count to `1..=MAX_RESULTS`.
///
/// Missing or zero means `DEFAULT_RESULTS`.
pub fn clamp_limit(requested: Option<u32>) -> usize {
    match requested {
        None | Some(0) => DEFAULT_RESULTS,
        Some(n) => (n as usize).min(MAX_RESULTS),
    }
}

/// Append the (percent-encoded) paging parameters to an endpoint.
pub fn page_endpoint(base_endpoint: &str, page: u32) -> String {
    let separator = if base_endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{}{}page%5Bsize%5D={}&page%5Bnumber%5D={}",
        base_endpoint, separator, PAGE_SIZE, page
    )
}

/// Read pages of `base_endpoint`, keeping items accepted by `keep`, until
/// `limit` items are collected or the collection is exhausted.
pub async fn collect<T, F>(
    client: &StretyClient,
    base_endpoint: &str,
    mut keep: F,
    limit: usize,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned,
    F: FnMut(&T) -> bool,
{
    let mut items = Vec::new();
    if limit == 0 {
        return Ok(items);
    }

    let mut page = 1;
    let stop = loop {
        let response: ListResponse<T> = client.get_json(&page_endpoint(base_endpoint, page)).await?;

        if response.data.is_empty() {
            break StopReason::EmptyPage;
        }

        let has_next = response.has_next();
        for item in response.data {
            if !keep(&item) {
                continue;
            }
            items.push(item);
            if items.len() >= limit {
                break;
            }
        }

        if items.len() >= limit {
            break StopReason::LimitReached;
        }
        if !has_next {
            break StopReason::LastPage;
        }
        if page >= MAX_PAGES {
            tracing::warn!(endpoint = base_endpoint, pages = page, "Page ceiling reached");
            break StopReason::PageCeiling;
        }
        page += 1;
    };

    tracing::debug!(
        endpoint = base_endpoint,
        pages = page,
        count = items.len(),
        stop = ?stop,
        "Collection finished"
    );

    Ok(items)
}

/// Stable sort by due date ascending, items without a due date last.
///
/// Due dates are ISO 8601, so lexical order is chronological order.
pub fn sort_by_due_date<T, F>(items: &mut [T], due_date: F)
where
    F: Fn(&T) -> Option<&str>,
{
    items.sort_by(|a, b| match (due_date(a), due_date(b)) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
