//! Paginated version collection shared by listing endpoints.

use crate::upstream::ProviderResult;
use ohno::app_err;
use std::sync::Arc;

const LOG_TARGET: &str = "  paginate";

/// One page of an upstream listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Total number of items the upstream reports for the whole listing.
    pub total_count: u64,
}

/// Collect a paginated listing by issuing sequential page requests.
///
/// `fetch_page(offset, limit)` is called with `offset` stepping by `page_size`. After each page,
/// collection stops once `offset + page_size` reaches the reported total, once at least
/// `total_ceiling` items have been gathered, or once a page comes back empty. The first page is
/// always requested. The result keeps
/// upstream order and never holds more than `total_ceiling` items.
///
/// A page that is not found or fails aborts the whole collection with that outcome.
pub async fn collect_pages<T, F, Fut>(page_size: u64, total_ceiling: usize, mut fetch_page: F) -> ProviderResult<Vec<T>>
where
    F: FnMut(u64, u64) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    if page_size == 0 {
        return ProviderResult::Error(Arc::new(app_err!("page size must be at least 1")));
    }

    let mut all = Vec::new();
    let mut offset = 0;

    loop {
        let page = match fetch_page(offset, page_size).await {
            ProviderResult::Found(page) => page,
            ProviderResult::ProjectNotFound => return ProviderResult::ProjectNotFound,
            ProviderResult::VersionNotFound => return ProviderResult::VersionNotFound,
            ProviderResult::Error(e) => return ProviderResult::Error(e),
        };

        log::debug!(
            target: LOG_TARGET,
            "Received {} items at offset {offset} (upstream reports {} total)",
            page.items.len(),
            page.total_count
        );

        if page.items.is_empty() {
            break;
        }

        all.extend(page.items);

        if offset.saturating_add(page_size) >= page.total_count || all.len() >= total_ceiling {
            break;
        }

        offset += page_size;
    }

    if all.len() > total_ceiling {
        log::debug!(target: LOG_TARGET, "Truncating {} collected items to {total_ceiling}", all.len());
        all.truncate(total_ceiling);
    }

    ProviderResult::Found(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn found<T>(result: ProviderResult<T>) -> T {
        match result {
            ProviderResult::Found(data) => data,
            other => panic!("expected Found, got {}", other.status_str()),
        }
    }

    /// Serves `total` sequential integers in pages and records every (offset, limit) requested.
    fn fake_listing(total: u64) -> (Arc<Mutex<Vec<(u64, u64)>>>, impl FnMut(u64, u64) -> core::future::Ready<ProviderResult<Page<u64>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let fetch = move |offset: u64, limit: u64| {
            recorded.lock().unwrap().push((offset, limit));
            let items = (offset..total.min(offset + limit)).collect();
            core::future::ready(ProviderResult::Found(Page { items, total_count: total }))
        };
        (calls, fetch)
    }

    #[tokio::test]
    async fn test_single_page_when_total_fits() {
        let (calls, fetch) = fake_listing(5);
        let result = found(collect_pages(20, 20, fetch).await);
        assert_eq!(result, vec![0, 1, 2, 3, 4]);
        assert_eq!(*calls.lock().unwrap(), vec![(0, 20)]);
    }

    #[tokio::test]
    async fn test_stops_at_first_page_reaching_count() {
        let (calls, fetch) = fake_listing(25);
        let result = found(collect_pages(10, 100, fetch).await);
        assert_eq!(result.len(), 25);
        assert_eq!(*calls.lock().unwrap(), vec![(0, 10), (10, 10), (20, 10)]);
    }

    #[tokio::test]
    async fn test_exact_multiple_does_not_fetch_extra_page() {
        let (calls, fetch) = fake_listing(20);
        let result = found(collect_pages(10, 100, fetch).await);
        assert_eq!(result.len(), 20);
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ceiling_stops_collection() {
        let (calls, fetch) = fake_listing(1000);
        let result = found(collect_pages(20, 20, fetch).await);
        assert_eq!(result, (0..20).collect::<Vec<_>>());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ceiling_truncates_overshooting_page() {
        let (calls, fetch) = fake_listing(1000);
        let result = found(collect_pages(20, 30, fetch).await);
        assert_eq!(result, (0..30).collect::<Vec<_>>());
        assert_eq!(calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing_fetches_one_page() {
        let (calls, fetch) = fake_listing(0);
        let result = found(collect_pages(20, 20, fetch).await);
        assert!(result.is_empty());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_stops_collection() {
        let mut calls = 0;
        let result = collect_pages::<u64, _, _>(10, 100, |offset, _| {
            calls += 1;
            core::future::ready(ProviderResult::Found(Page {
                items: if offset == 0 { vec![1, 2] } else { Vec::new() },
                total_count: 10_000,
            }))
        })
        .await;

        assert_eq!(found(result), vec![1, 2]);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_failure_aborts_collection() {
        let mut calls = 0;
        let result = collect_pages(10, 100, |offset, _| {
            calls += 1;
            core::future::ready(if offset == 0 {
                ProviderResult::Found(Page {
                    items: vec![1, 2, 3],
                    total_count: 50,
                })
            } else {
                ProviderResult::Error(Arc::new(app_err!("boom")))
            })
        })
        .await;

        assert!(matches!(result, ProviderResult::Error(_)));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_not_found_propagates() {
        let result = collect_pages::<u64, _, _>(10, 100, |_, _| core::future::ready(ProviderResult::ProjectNotFound)).await;
        assert!(matches!(result, ProviderResult::ProjectNotFound));
    }

    #[tokio::test]
    async fn test_zero_page_size_is_error() {
        let (calls, fetch) = fake_listing(10);
        let result = collect_pages(0, 100, fetch).await;
        assert!(matches!(result, ProviderResult::Error(_)));
        assert!(calls.lock().unwrap().is_empty());
    }
}
