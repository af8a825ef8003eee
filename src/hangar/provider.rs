use super::models::{Platform, Project, Version, VersionsPage};
use crate::Result;
use crate::upstream::cache::{Cache, CacheKey, CacheResult};
use crate::upstream::pagination::{Page, collect_pages};
use crate::upstream::{ApiResult, CachePolicy, Client, ProviderResult, cached_get_json};
use ohno::EnrichableExt;
use std::sync::Arc;
use url::Url;

const LOG_TARGET: &str = "    hangar";

/// Cache family for project lookups.
pub const PROJECT_CACHE: &str = "hangar-project";

/// Cache family for version lookups and listings.
pub const VERSION_CACHE: &str = "hangar-version";

const NO_QUERY: &[(&str, &str)] = &[];

/// Map a Hangar API result to a provider result, enriching failures.
macro_rules! into_provider_result {
    ($expr:expr, $not_found:expr, $($what:tt)*) => {
        match $expr {
            ApiResult::Success(data) => ProviderResult::Found(data),
            ApiResult::NotFound => $not_found,
            ApiResult::Failed(e) => ProviderResult::Error(Arc::new(e.enrich_with(|| format!($($what)*)))),
        }
    };
}

/// Fetches projects and versions from the Hangar API.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    cache: Cache,
    policy: CachePolicy,
    page_size: u64,
    total_ceiling: usize,
}

impl Provider {
    /// `page_size` and `total_ceiling` bound version listings: each listing request asks for
    /// `page_size` versions and collection stops after `total_ceiling` versions.
    #[must_use]
    pub const fn new(client: Client, cache: Cache, policy: CachePolicy, page_size: u64, total_ceiling: usize) -> Self {
        Self {
            client,
            cache,
            policy,
            page_size,
            total_ceiling,
        }
    }

    pub async fn get_project(&self, slug: &str) -> ProviderResult<Project> {
        let key = CacheKey::new(PROJECT_CACHE, &[slug]);
        let result = cached_get_json(&self.client, &self.cache, &key, self.policy.project_ttl, &["projects", slug], NO_QUERY).await;
        into_provider_result!(result, ProviderResult::ProjectNotFound, "fetching Hangar project '{slug}'")
    }

    /// Fetch one version of a project.
    pub async fn get_version(&self, slug: &str, version: &str) -> ProviderResult<Version> {
        let key = CacheKey::new(VERSION_CACHE, &["get", slug, version]);
        let result = cached_get_json(
            &self.client,
            &self.cache,
            &key,
            self.policy.version_ttl,
            &["projects", slug, "versions", version],
            NO_QUERY,
        )
        .await;

        into_provider_result!(result, ProviderResult::VersionNotFound, "fetching Hangar version '{slug}' {version}")
    }

    /// Collect a project's versions, newest first, optionally filtered by platform and channel.
    ///
    /// The listing holds at most the configured ceiling of versions.
    pub async fn get_versions(&self, slug: &str, platform: Option<Platform>, channel: Option<&str>) -> ProviderResult<Vec<Version>> {
        let platform_arg = platform.map_or("", Platform::upstream_name);
        let key = CacheKey::new(VERSION_CACHE, &["list", slug, platform_arg, channel.unwrap_or("")]);

        match self.cache.load::<Vec<Version>>(&key) {
            CacheResult::Data(versions) => return ProviderResult::Found(versions),
            CacheResult::NoData(reason) => {
                log::debug!(target: LOG_TARGET, "Using cached negative result for {key}: {reason}");
                return ProviderResult::ProjectNotFound;
            }
            CacheResult::Miss => {}
        }

        log::debug!(target: LOG_TARGET, "Collecting versions of '{slug}' (platform: {platform_arg:?}, channel: {channel:?})");

        let result = collect_pages(self.page_size, self.total_ceiling, |offset, limit| self.get_versions_page(slug, platform, channel, offset, limit)).await;

        match &result {
            ProviderResult::Found(versions) => self.cache.save(&key, versions, self.policy.version_ttl),
            ProviderResult::ProjectNotFound => self.cache.save_no_data(&key, &format!("Hangar project '{slug}' not found"), self.policy.version_ttl),
            ProviderResult::VersionNotFound | ProviderResult::Error(_) => {}
        }

        result
    }

    async fn get_versions_page(&self, slug: &str, platform: Option<Platform>, channel: Option<&str>, offset: u64, limit: u64) -> ProviderResult<Page<Version>> {
        let mut query = vec![
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("includeHiddenChannels", "false".to_string()),
        ];

        if let Some(platform) = platform {
            query.push(("platform", platform.upstream_name().to_string()));
        }

        if let Some(channel) = channel {
            query.push(("channel", channel.to_string()));
        }

        let result = self.client.get_json::<VersionsPage, _>(&["projects", slug, "versions"], &query).await;
        into_provider_result!(result, ProviderResult::ProjectNotFound, "listing versions of Hangar project '{slug}' at offset {offset}").map(|page| Page {
            items: page.result,
            total_count: page.pagination.count,
        })
    }

    /// Where Hangar serves the file of `version` built for `platform`.
    pub fn download_url(&self, slug: &str, version: &str, platform: Platform) -> Result<Url> {
        self.client
            .url_for(&["projects", slug, "versions", version, platform.upstream_name(), "download"])
    }
}
