//! Plumbing shared by the upstream platform providers.

pub mod cache;
mod client;
pub mod pagination;
mod provider_result;

pub use client::{ApiResult, Client};
pub use provider_result::ProviderResult;

use cache::{Cache, CacheKey, CacheResult};
use core::time::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "  upstream";

/// How long results of one call family stay cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub project_ttl: Duration,
    pub version_ttl: Duration,
}

/// GET a JSON resource through the cache.
///
/// Found data and not-found answers are cached under `key` for `ttl`. Failures are never cached.
pub async fn cached_get_json<T, Q>(client: &Client, cache: &Cache, key: &CacheKey, ttl: Duration, segments: &[&str], query: &Q) -> ApiResult<T>
where
    T: DeserializeOwned + Serialize,
    Q: Serialize + ?Sized,
{
    match cache.load::<T>(key) {
        CacheResult::Data(data) => return ApiResult::Success(data),
        CacheResult::NoData(reason) => {
            log::debug!(target: LOG_TARGET, "Using cached negative result for {key}: {reason}");
            return ApiResult::NotFound;
        }
        CacheResult::Miss => {}
    }

    let result = client.get_json::<T, Q>(segments, query).await;
    match &result {
        ApiResult::Success(data) => cache.save(key, data, ttl),
        ApiResult::NotFound => cache.save_no_data(key, &format!("{} reported not found", client.platform()), ttl),
        ApiResult::Failed(_) => {}
    }

    result
}
