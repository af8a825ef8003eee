use super::models::{Dependency, ExpandedDependency, Loader, Project, ResolvedDependency, ResolvedVersion, Version};
use crate::upstream::cache::{Cache, CacheKey};
use crate::upstream::{ApiResult, CachePolicy, Client, ProviderResult, cached_get_json};
use core::mem;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, join_all};
use ohno::EnrichableExt;
use std::sync::Arc;

const LOG_TARGET: &str = "  modrinth";

/// Cache family for project lookups.
pub const PROJECT_CACHE: &str = "modrinth-project";

/// Cache family for version lookups and listings.
pub const VERSION_CACHE: &str = "modrinth-version";

const NO_QUERY: &[(&str, &str)] = &[];

/// Fetches projects and versions from the Modrinth API and expands version dependencies.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    cache: Cache,
    policy: CachePolicy,
    expand_depth: u32,
}

impl Provider {
    /// `expand_depth` is the dependency depth [`Self::get_version`] expands to.
    #[must_use]
    pub const fn new(client: Client, cache: Cache, policy: CachePolicy, expand_depth: u32) -> Self {
        Self {
            client,
            cache,
            policy,
            expand_depth,
        }
    }

    pub async fn get_project(&self, project: &str) -> ProviderResult<Project> {
        let key = CacheKey::new(PROJECT_CACHE, &[project]);
        match cached_get_json(&self.client, &self.cache, &key, self.policy.project_ttl, &["project", project], NO_QUERY).await {
            ApiResult::Success(data) => ProviderResult::Found(data),
            ApiResult::NotFound => ProviderResult::ProjectNotFound,
            ApiResult::Failed(e) => ProviderResult::Error(Arc::new(e.enrich_with(|| format!("fetching Modrinth project '{project}'")))),
        }
    }

    /// List a project's versions that ship files for `loader`, newest first.
    pub async fn get_versions(&self, project: &str, loader: Loader) -> ProviderResult<Vec<Version>> {
        let key = CacheKey::new(VERSION_CACHE, &["list", project, loader.as_str()]);
        let loaders = format!("[\"{loader}\"]");
        let query = [("loaders", loaders.as_str())];

        match cached_get_json(&self.client, &self.cache, &key, self.policy.version_ttl, &["project", project, "version"], &query).await {
            ApiResult::Success(data) => ProviderResult::Found(data),
            ApiResult::NotFound => ProviderResult::ProjectNotFound,
            ApiResult::Failed(e) => {
                ProviderResult::Error(Arc::new(e.enrich_with(|| format!("listing {loader} versions of Modrinth project '{project}'"))))
            }
        }
    }

    /// Fetch one version record as Modrinth reports it, without touching its dependencies.
    pub async fn get_raw_version(&self, project: &str, version: &str) -> ProviderResult<Version> {
        let key = CacheKey::new(VERSION_CACHE, &["get", project, version]);
        match cached_get_json(
            &self.client,
            &self.cache,
            &key,
            self.policy.version_ttl,
            &["project", project, "version", version],
            NO_QUERY,
        )
        .await
        {
            ApiResult::Success(data) => ProviderResult::Found(data),
            ApiResult::NotFound => ProviderResult::VersionNotFound,
            ApiResult::Failed(e) => {
                ProviderResult::Error(Arc::new(e.enrich_with(|| format!("fetching Modrinth version '{project}' {version}"))))
            }
        }
    }

    /// Fetch a version and expand its dependencies to the configured depth.
    pub async fn get_version(&self, project: &str, version: &str) -> ProviderResult<ResolvedVersion> {
        self.fetch_version(project, version, self.expand_depth).await
    }

    /// Fetch a version and expand its dependencies `depth` levels deep.
    ///
    /// With a depth of zero the version's dependencies are all returned unexpanded.
    pub fn fetch_version<'a>(&'a self, project: &'a str, version: &'a str, depth: u32) -> BoxFuture<'a, ProviderResult<ResolvedVersion>> {
        async move {
            let mut record = match self.get_raw_version(project, version).await {
                ProviderResult::Found(record) => record,
                ProviderResult::ProjectNotFound => return ProviderResult::ProjectNotFound,
                ProviderResult::VersionNotFound => return ProviderResult::VersionNotFound,
                ProviderResult::Error(e) => return ProviderResult::Error(e),
            };

            let declared = mem::take(&mut record.dependencies);
            let dependencies = if depth == 0 {
                declared.into_iter().map(ResolvedDependency::Unexpanded).collect()
            } else {
                self.expand(declared, depth).await
            };

            ProviderResult::Found(ResolvedVersion {
                version: record,
                dependencies,
            })
        }
        .boxed()
    }

    /// Expand dependency references into the versions they pin.
    ///
    /// A `max_depth` of zero yields an empty list. Otherwise every reference is expanded
    /// concurrently with one less level of depth, and the output has one entry per input in
    /// input order. References that cannot be expanded come back unchanged.
    pub async fn expand(&self, dependencies: Vec<Dependency>, max_depth: u32) -> Vec<ResolvedDependency> {
        if max_depth == 0 {
            return Vec::new();
        }

        let depth = max_depth - 1;
        join_all(dependencies.into_iter().map(|dependency| self.expand_dependency(dependency, depth))).await
    }

    async fn expand_dependency(&self, dependency: Dependency, depth: u32) -> ResolvedDependency {
        let (Some(project), Some(version)) = (dependency.project_id.as_deref(), dependency.version_id.as_deref()) else {
            return ResolvedDependency::Unexpanded(dependency);
        };

        let result = self.fetch_version(project, version, depth).await;
        match result {
            ProviderResult::Found(resolved) => match ExpandedDependency::try_new(dependency, resolved) {
                Ok(expanded) => ResolvedDependency::Expanded(expanded),
                Err(dependency) => {
                    log::info!(
                        target: LOG_TARGET,
                        "Not expanding dependency on '{}': fetched version does not match pin {:?}",
                        dependency.project_id.as_deref().unwrap_or_default(),
                        dependency.version_id
                    );
                    ResolvedDependency::Unexpanded(dependency)
                }
            },
            ProviderResult::Error(e) => {
                log::info!(target: LOG_TARGET, "Could not expand dependency on '{project}' {version}: {e:#}");
                ResolvedDependency::Unexpanded(dependency)
            }
            other => {
                log::debug!(target: LOG_TARGET, "Could not expand dependency on '{project}' {version}: {}", other.status_str());
                ResolvedDependency::Unexpanded(dependency)
            }
        }
    }
}
