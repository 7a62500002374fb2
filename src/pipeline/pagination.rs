//! Pagination drivers for list endpoints of unknown size
//!
//! Two idioms are supported:
//! - page number: 1-based `pageNumber` with a fixed `pageSize`; a short page is the last one
//! - skip/top: running `$skip` offset with a fixed `$top`, bounded by the reported total
//!
//! Both concatenate pages in server order. A failed request is reported to the
//! [`FailureSink`] and ends pagination; whatever was gathered is returned.

use std::future::Future;
use tracing::debug;

use super::failures::{Failure, FailureSink};
use crate::api::ApiError;

/// One skip/top window plus the server's declared total
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPage<T> {
    pub total_records: u64,
    pub items: Vec<T>,
}

/// Collect every page of a page-number endpoint
pub async fn collect_numbered_pages<T, F, Fut>(
    resource: &'static str,
    page_size: u32,
    mut fetch_page: F,
    failures: &mut dyn FailureSink,
) -> Vec<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        match fetch_page(page_number).await {
            Ok(page) => {
                let count = page.len();
                debug!(resource, page_number, count, "fetched page");
                items.extend(page);
                if count < page_size as usize {
                    break;
                }
                page_number += 1;
            }
            Err(error) => {
                failures.record(Failure::PageFetch {
                    resource,
                    page: u64::from(page_number),
                    error,
                });
                break;
            }
        }
    }

    items
}

/// Collect every window of a skip/top endpoint
pub async fn collect_offset_pages<T, F, Fut>(
    resource: &'static str,
    top: u64,
    mut fetch_page: F,
    failures: &mut dyn FailureSink,
) -> Vec<T>
where
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = Result<OffsetPage<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut skip: u64 = 0;

    loop {
        match fetch_page(skip, top).await {
            Ok(page) => {
                let count = page.items.len();
                debug!(resource, skip, count, total = page.total_records, "fetched page");
                items.extend(page.items);
                skip += top;
                // An empty window means the server has nothing more, whatever its total says
                if skip >= page.total_records || count == 0 {
                    break;
                }
            }
            Err(error) => {
                failures.record(Failure::PageFetch {
                    resource,
                    page: skip / top.max(1) + 1,
                    error,
                });
                break;
            }
        }
    }

    items
}
