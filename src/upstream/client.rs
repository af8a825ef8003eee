//! Upstream fetch adapter
//!
//! Minimal JSON-over-HTTP client shared by the Hangar and Modrinth providers. Each call performs a
//! single GET against the platform's base URL and classifies the outcome.

use crate::Result;
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, app_err};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "  upstream";

const USER_AGENT: &str = concat!("maven-bridge/", env!("CARGO_PKG_VERSION"));

/// Result of an upstream API call
#[derive(Debug)]
pub enum ApiResult<T> {
    /// Request succeeded and the body parsed
    Success(T),

    /// The requested resource was not found (404)
    NotFound,

    /// Any other HTTP status, a transport error, or an unparseable body
    Failed(ohno::AppError),
}

/// Upstream API client bound to one platform's base URL
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: Url,
    platform: &'static str,
}

impl Client {
    /// Create a client for `base_url`, applying `timeout` to every request.
    pub fn new(platform: &'static str, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).into_app_err_with(|| format!("invalid {platform} API base URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            return Err(app_err!("{platform} API base URL '{base_url}' cannot be used as a base"));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .into_app_err("unable to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            platform,
        })
    }

    /// Name of the platform this client talks to, used in log and error messages
    #[must_use]
    pub const fn platform(&self) -> &'static str {
        self.platform
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build an absolute URL by appending percent-encoded path segments to the base URL.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| app_err!("{} API base URL '{}' cannot be used as a base", self.platform, self.base_url))?;
            let _ = path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// GET `segments` with `query` and parse the JSON body as `T`.
    pub async fn get_json<T, Q>(&self, segments: &[&str], query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = match self.url_for(segments) {
            Ok(url) => url,
            Err(e) => return ApiResult::Failed(e),
        };

        log::debug!(target: LOG_TARGET, "Querying {} at '{url}'", self.platform);

        let resp = match self.client.get(url.clone()).query(query).send().await {
            Ok(resp) => resp,
            Err(e) => {
                return ApiResult::Failed(ohno::AppError::from(e).enrich_with(|| format!("request to '{url}' failed")));
            }
        };

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            log::debug!(target: LOG_TARGET, "{} answered 404 for '{url}'", self.platform);
            return ApiResult::NotFound;
        }

        if !status.is_success() {
            log::info!(target: LOG_TARGET, "{} answered {status} for '{url}'", self.platform);
            return ApiResult::Failed(app_err!("{} answered {status} for '{url}'", self.platform));
        }

        match resp.json::<T>().await {
            Ok(data) => ApiResult::Success(data),
            Err(e) => ApiResult::Failed(ohno::AppError::from(e).enrich_with(|| format!("could not parse response from '{url}'"))),
        }
    }
}
