use super::path::{Artifact, PathError, RepositoryPath, Source};
use super::response::RepositoryResponse;
use crate::Result;
use crate::config::Config;
use crate::hangar::{self, Platform};
use crate::maven::metadata::{self, parse_timestamp};
use crate::maven::{Coordinate, XML_CONTENT_TYPE, group_id, pom};
use crate::modrinth::{self, Loader};
use crate::upstream::cache::{Cache, MemoryCache};
use crate::upstream::{CachePolicy, Client, ProviderResult};
use core::fmt;
use core::time::Duration;
use std::sync::Arc;
use strum::{Display, EnumString};

const LOG_TARGET: &str = "repository";

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Either a value to keep working with, or the response to answer with right away.
type Step<T> = core::result::Result<T, RepositoryResponse>;

/// Request methods the repository answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
}

/// How long clients may keep each kind of document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxAges {
    pub metadata: Duration,
    pub pom: Duration,
    pub jar: Duration,
}

/// Serves the Maven repository layout from the Hangar and Modrinth providers.
#[derive(Debug, Clone)]
pub struct Repository {
    hangar: hangar::Provider,
    modrinth: modrinth::Provider,
    max_ages: MaxAges,
}

impl Repository {
    #[must_use]
    pub const fn new(hangar: hangar::Provider, modrinth: modrinth::Provider, max_ages: MaxAges) -> Self {
        Self {
            hangar,
            modrinth,
            max_ages,
        }
    }

    /// Build both providers over one shared in-memory cache, bounded per call family.
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.request_timeout();

        let store = MemoryCache::new(0)
            .with_limit(hangar::PROJECT_CACHE, config.hangar.cache_project_max_size)
            .with_limit(hangar::VERSION_CACHE, config.hangar.cache_version_max_size)
            .with_limit(modrinth::PROJECT_CACHE, config.modrinth.cache_project_max_size)
            .with_limit(modrinth::VERSION_CACHE, config.modrinth.cache_version_max_size);
        let cache = Cache::new(Arc::new(store));

        let hangar = hangar::Provider::new(
            Client::new("Hangar", &config.hangar.api_base_url, timeout)?,
            cache.clone(),
            CachePolicy {
                project_ttl: Duration::from_secs(config.hangar.cache_project_expiration_seconds),
                version_ttl: Duration::from_secs(config.hangar.cache_version_expiration_seconds),
            },
            config.hangar.versions_limit_per_batch,
            config.hangar.versions_total_to_fetch,
        );

        let modrinth = modrinth::Provider::new(
            Client::new("Modrinth", &config.modrinth.api_base_url, timeout)?,
            cache,
            CachePolicy {
                project_ttl: Duration::from_secs(config.modrinth.cache_project_expiration_seconds),
                version_ttl: Duration::from_secs(config.modrinth.cache_version_expiration_seconds),
            },
            config.modrinth.expand_dependencies_depth,
        );

        let max_ages = MaxAges {
            metadata: config.cache.metadata_max_age(),
            pom: config.cache.pom_max_age(),
            jar: config.cache.jar_max_age(),
        };

        Ok(Self::new(hangar, modrinth, max_ages))
    }

    pub async fn get(&self, path: &str) -> RepositoryResponse {
        self.handle(Method::Get, path).await
    }

    /// Answer with the headers a GET would carry, for POM paths only.
    pub async fn head(&self, path: &str) -> RepositoryResponse {
        self.handle(Method::Head, path).await
    }

    pub async fn handle(&self, method: Method, path: &str) -> RepositoryResponse {
        let parsed = match RepositoryPath::parse(path) {
            Ok(parsed) => parsed,
            Err(e @ PathError::UnknownRoute(_)) => return RepositoryResponse::NotFound(e.to_string()),
            Err(e) => return RepositoryResponse::BadRequest(e.to_string()),
        };

        if method == Method::Head && !matches!(parsed.artifact, Artifact::Pom { .. }) {
            return RepositoryResponse::MethodNotAllowed;
        }

        log::debug!(target: LOG_TARGET, "{method} {path}");

        let result = match (&parsed.source, &parsed.artifact) {
            (Source::Hangar { platform, channel }, Artifact::Metadata) => {
                self.hangar_metadata(&parsed.project, *platform, channel.as_deref()).await
            }
            (Source::Hangar { platform, channel }, Artifact::Pom { version, file_stem }) => {
                self.hangar_pom(method, &parsed.project, *platform, channel.as_deref(), version, file_stem).await
            }
            (Source::Hangar { platform, channel }, Artifact::Jar { version, file_stem }) => {
                self.hangar_jar(&parsed.project, *platform, channel.as_deref(), version, file_stem)
            }
            (Source::Modrinth { loader }, Artifact::Metadata) => self.modrinth_metadata(&parsed.project, *loader).await,
            (Source::Modrinth { loader }, Artifact::Pom { version, file_stem }) => {
                self.modrinth_pom(method, &parsed.project, *loader, version, file_stem).await
            }
            (Source::Modrinth { loader }, Artifact::Jar { version, file_stem }) => {
                self.modrinth_jar(&parsed.project, *loader, version, file_stem).await
            }
        };

        let response = result.unwrap_or_else(|response| response);
        if let RepositoryResponse::UpstreamFailure(e) = &response {
            log::warn!(target: LOG_TARGET, "{method} {path} failed: {e:#}");
        } else {
            log::debug!(target: LOG_TARGET, "{method} {path} -> {}", response.status());
        }

        response
    }

    async fn hangar_metadata(&self, slug: &str, platform: Platform, channel: Option<&str>) -> Step<RepositoryResponse> {
        let versions = found(self.hangar.get_versions(slug, Some(platform), channel).await, || format!("Hangar project '{slug}'"))?;
        if versions.is_empty() {
            let project = self.hangar.get_project(slug).await;
            return Err(empty_listing(&project, &format!("Hangar project '{slug}'"), platform));
        }

        let group_id = group_id::hangar(Some(platform), channel);
        let body = metadata::render(&group_id, slug, &versions).map_err(upstream_failure)?;
        Ok(document(body, self.max_ages.metadata))
    }

    async fn hangar_pom(
        &self,
        method: Method,
        slug: &str,
        platform: Platform,
        channel: Option<&str>,
        version: &str,
        file_stem: &str,
    ) -> Step<RepositoryResponse> {
        let coordinate = Coordinate::new(group_id::hangar(Some(platform), channel), slug, version);
        check_file_stem(&coordinate, file_stem)?;

        let record = found(self.hangar.get_version(slug, version).await, || format!("Hangar version {coordinate}"))?;
        let body = pom::render(&coordinate, pom::hangar_dependencies(&record.dependencies)).map_err(upstream_failure)?;

        Ok(self.pom_response(method, body, record.created_at.as_deref()))
    }

    fn hangar_jar(&self, slug: &str, platform: Platform, channel: Option<&str>, version: &str, file_stem: &str) -> Step<RepositoryResponse> {
        let coordinate = Coordinate::new(group_id::hangar(Some(platform), channel), slug, version);
        check_file_stem(&coordinate, file_stem)?;

        let location = self.hangar.download_url(slug, version, platform).map_err(upstream_failure)?;
        Ok(RepositoryResponse::Redirect {
            location: location.into(),
            max_age: self.max_ages.jar,
        })
    }

    async fn modrinth_metadata(&self, project: &str, loader: Loader) -> Step<RepositoryResponse> {
        let versions = found(self.modrinth.get_versions(project, loader).await, || format!("Modrinth project '{project}'"))?;
        if versions.is_empty() {
            let record = self.modrinth.get_project(project).await;
            return Err(empty_listing(&record, &format!("Modrinth project '{project}'"), loader));
        }

        let body = metadata::render(&group_id::modrinth(loader), project, &versions).map_err(upstream_failure)?;
        Ok(document(body, self.max_ages.metadata))
    }

    async fn modrinth_pom(&self, method: Method, project: &str, loader: Loader, version: &str, file_stem: &str) -> Step<RepositoryResponse> {
        let group_id = group_id::modrinth(loader);
        check_file_stem(&Coordinate::new(group_id.as_str(), project, version), file_stem)?;

        let resolved = found(self.modrinth.get_version(project, version).await, || {
            format!("Modrinth version '{project}' {version}")
        })?;
        check_loader(&resolved.version, loader)?;

        let coordinate = Coordinate::new(group_id.as_str(), project, resolved.version.version_number.as_str());
        let body = pom::render(&coordinate, pom::modrinth_dependencies(&group_id, &resolved.dependencies)).map_err(upstream_failure)?;

        Ok(self.pom_response(method, body, resolved.version.date_published.as_deref()))
    }

    async fn modrinth_jar(&self, project: &str, loader: Loader, version: &str, file_stem: &str) -> Step<RepositoryResponse> {
        check_file_stem(&Coordinate::new(group_id::modrinth(loader), project, version), file_stem)?;

        let record = found(self.modrinth.get_raw_version(project, version).await, || {
            format!("Modrinth version '{project}' {version}")
        })?;
        check_loader(&record, loader)?;

        let Some(file) = record.primary_file() else {
            return Err(RepositoryResponse::NotFound(format!(
                "Modrinth version '{project}' {version} has no primary file"
            )));
        };

        Ok(RepositoryResponse::Redirect {
            location: file.url.clone(),
            max_age: self.max_ages.jar,
        })
    }

    fn pom_response(&self, method: Method, body: String, published: Option<&str>) -> RepositoryResponse {
        match method {
            Method::Get => document(body, self.max_ages.pom),
            Method::Head => RepositoryResponse::Headers {
                content_type: XML_CONTENT_TYPE,
                content_length: body.len(),
                last_modified: published.and_then(http_date),
                max_age: self.max_ages.pom,
            },
        }
    }
}

const fn document(body: String, max_age: Duration) -> RepositoryResponse {
    RepositoryResponse::Document {
        content_type: XML_CONTENT_TYPE,
        body,
        max_age,
    }
}

/// Unwrap a found value or turn the lookup outcome into the matching response.
fn found<T>(result: ProviderResult<T>, what: impl FnOnce() -> String) -> Step<T> {
    match result {
        ProviderResult::Found(data) => Ok(data),
        ProviderResult::ProjectNotFound | ProviderResult::VersionNotFound => Err(RepositoryResponse::NotFound(format!("{} not found", what()))),
        ProviderResult::Error(e) => Err(RepositoryResponse::UpstreamFailure(e)),
    }
}

/// An empty listing either means the project is gone or that nothing matches the requested filter.
fn empty_listing<T>(project: &ProviderResult<T>, what: &str, filter: impl fmt::Display) -> RepositoryResponse {
    if project.is_not_found() {
        RepositoryResponse::NotFound(format!("{what} not found"))
    } else {
        RepositoryResponse::NotFound(format!("{what} has no {filter} versions"))
    }
}

fn check_file_stem(coordinate: &Coordinate, file_stem: &str) -> Step<()> {
    coordinate
        .validate_file_stem(file_stem)
        .map_err(|e| RepositoryResponse::BadRequest(e.to_string()))
}

fn check_loader(version: &modrinth::Version, loader: Loader) -> Step<()> {
    if version.supports(loader) {
        Ok(())
    } else {
        Err(RepositoryResponse::NotFound(format!(
            "Modrinth version '{}' does not support {loader}",
            version.version_number
        )))
    }
}

fn upstream_failure(e: ohno::AppError) -> RepositoryResponse {
    RepositoryResponse::UpstreamFailure(Arc::new(e))
}

/// Format an upstream timestamp as an HTTP date, or `None` when it cannot be read.
fn http_date(published: &str) -> Option<String> {
    match parse_timestamp(published) {
        Ok(dt) => Some(dt.and_utc().format(HTTP_DATE_FORMAT).to_string()),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Omitting Last-Modified: {e}");
            None
        }
    }
}
