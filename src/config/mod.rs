//! Settings loading and validation.

use crate::Result;
use camino::Utf8Path;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File names searched for, in order, when no configuration path is given
pub const CONFIG_FILE_NAMES: [&str; 4] = ["bridge.toml", "bridge.yml", "bridge.yaml", "bridge.json"];

/// Prefix of environment variables overriding file settings.
///
/// Sections are separated by `__`, so `MC_MAVEN_BRIDGE__HANGAR__API_BASE_URL` sets `hangar.api_base_url`.
pub const ENV_PREFIX: &str = "MC_MAVEN_BRIDGE";

const fn default_request_timeout_seconds() -> u64 {
    30
}

const fn default_expiration_seconds() -> u64 {
    3600
}

const fn default_cache_max_size() -> usize {
    20
}

const fn default_versions_limit_per_batch() -> u64 {
    20
}

const fn default_versions_total_to_fetch() -> usize {
    20
}

const fn default_expand_dependencies_depth() -> u32 {
    1
}

fn default_hangar_api_base_url() -> String {
    "https://hangar.papermc.io/api/v1".to_string()
}

fn default_modrinth_api_base_url() -> String {
    "https://api.modrinth.com/v2".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seconds to wait for a single upstream request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub hangar: HangarConfig,

    #[serde(default)]
    pub modrinth: ModrinthConfig,
}

/// Client-side cache lifetimes advertised through `Cache-Control`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_expiration_seconds")]
    pub pom_expiration_seconds: u64,

    #[serde(default = "default_expiration_seconds")]
    pub metadata_expiration_seconds: u64,

    #[serde(default = "default_expiration_seconds")]
    pub jar_expiration_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HangarConfig {
    #[serde(default = "default_hangar_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_expiration_seconds")]
    pub cache_project_expiration_seconds: u64,

    #[serde(default = "default_cache_max_size")]
    pub cache_project_max_size: usize,

    #[serde(default = "default_expiration_seconds")]
    pub cache_version_expiration_seconds: u64,

    #[serde(default = "default_cache_max_size")]
    pub cache_version_max_size: usize,

    /// Versions requested per listing page
    #[serde(default = "default_versions_limit_per_batch")]
    pub versions_limit_per_batch: u64,

    /// Most versions collected for one listing
    #[serde(default = "default_versions_total_to_fetch")]
    pub versions_total_to_fetch: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModrinthConfig {
    #[serde(default = "default_modrinth_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_expiration_seconds")]
    pub cache_project_expiration_seconds: u64,

    #[serde(default = "default_cache_max_size")]
    pub cache_project_max_size: usize,

    #[serde(default = "default_expiration_seconds")]
    pub cache_version_expiration_seconds: u64,

    #[serde(default = "default_cache_max_size")]
    pub cache_version_max_size: usize,

    /// Dependency levels expanded when generating a POM
    #[serde(default = "default_expand_dependencies_depth")]
    pub expand_dependencies_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_seconds: default_request_timeout_seconds(),
            cache: CacheConfig::default(),
            hangar: HangarConfig::default(),
            modrinth: ModrinthConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            pom_expiration_seconds: default_expiration_seconds(),
            metadata_expiration_seconds: default_expiration_seconds(),
            jar_expiration_seconds: default_expiration_seconds(),
        }
    }
}

impl Default for HangarConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_hangar_api_base_url(),
            cache_project_expiration_seconds: default_expiration_seconds(),
            cache_project_max_size: default_cache_max_size(),
            cache_version_expiration_seconds: default_expiration_seconds(),
            cache_version_max_size: default_cache_max_size(),
            versions_limit_per_batch: default_versions_limit_per_batch(),
            versions_total_to_fetch: default_versions_total_to_fetch(),
        }
    }
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_modrinth_api_base_url(),
            cache_project_expiration_seconds: default_expiration_seconds(),
            cache_project_max_size: default_cache_max_size(),
            cache_version_expiration_seconds: default_expiration_seconds(),
            cache_version_max_size: default_cache_max_size(),
            expand_dependencies_depth: default_expand_dependencies_depth(),
        }
    }
}

impl Config {
    /// Load configuration from a file or use defaults, then apply environment overrides
    ///
    /// Without an explicit `config_path`, the first of [`CONFIG_FILE_NAMES`] found in `dir` is used.
    /// Variables starting with [`ENV_PREFIX`] take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        Self::load_with_env(dir, config_path, None)
    }

    fn load_with_env(dir: &Utf8Path, config_path: Option<&Utf8Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let config = Self::read(dir, config_path)?.with_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    fn read(dir: &Utf8Path, config_path: Option<&Utf8Path>) -> Result<Self> {
        if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading maven-bridge configuration file '{path}'"))?;
            return Self::parse(path, &text);
        }

        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            match fs::read_to_string(&path) {
                Ok(text) => return Self::parse(&path, &text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).into_app_err_with(|| format!("reading maven-bridge configuration file '{path}'")),
            }
        }

        log::debug!("No configuration file found in '{dir}', using defaults");
        Ok(Self::default())
    }

    /// Layer `MC_MAVEN_BRIDGE__*` variables over these settings.
    ///
    /// `vars` replaces the process environment when given.
    fn with_env_overrides(self, vars: Option<config::Map<String, String>>) -> Result<Self> {
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(vars);

        let base = config::Config::try_from(&self).into_app_err("preparing configuration for environment overrides")?;
        let merged = config::Config::builder()
            .add_source(base)
            .add_source(environment)
            .build()
            .into_app_err_with(|| format!("reading {ENV_PREFIX}__* environment variables"))?;

        merged
            .try_deserialize()
            .into_app_err_with(|| format!("applying {ENV_PREFIX}__* environment variables"))
    }

    fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        let config = match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from '{path}'"))?,
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from '{path}'"))?,
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from '{path}'"))?,
            _ => return Err(app_err!("unsupported configuration file extension: '{extension}'")),
        };

        Ok(config)
    }

    /// Save the default configuration
    ///
    /// TOML output keeps the commented template; YAML and JSON are serialized from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the extension is not supported
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => DEFAULT_CONFIG_TOML.to_string(),
            "yml" | "yaml" => serde_yaml::to_string(&Self::default()).into_app_err("serializing default configuration to YAML")?,
            "json" => serde_json::to_string_pretty(&Self::default()).into_app_err("serializing default configuration to JSON")?,
            _ => return Err(app_err!("unsupported configuration file extension: '{extension}'")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or a base URL is unusable
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_seconds == 0 {
            return Err(app_err!("request_timeout_seconds must be at least 1"));
        }

        if self.hangar.versions_limit_per_batch == 0 {
            return Err(app_err!("hangar.versions_limit_per_batch must be at least 1"));
        }

        if self.hangar.versions_total_to_fetch == 0 {
            return Err(app_err!("hangar.versions_total_to_fetch must be at least 1"));
        }

        validate_base_url("hangar.api_base_url", &self.hangar.api_base_url)?;
        validate_base_url("modrinth.api_base_url", &self.modrinth.api_base_url)?;

        Ok(())
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn validate_base_url(key: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).into_app_err_with(|| format!("{key} is not a valid URL: '{value}'"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(app_err!("{key} must be an http or https URL, got '{value}'"));
    }

    if url.cannot_be_a_base() {
        return Err(app_err!("{key} cannot be used as a base URL: '{value}'"));
    }

    Ok(())
}

impl CacheConfig {
    #[must_use]
    pub const fn pom_max_age(&self) -> Duration {
        Duration::from_secs(self.pom_expiration_seconds)
    }

    #[must_use]
    pub const fn metadata_max_age(&self) -> Duration {
        Duration::from_secs(self.metadata_expiration_seconds)
    }

    #[must_use]
    pub const fn jar_max_age(&self) -> Duration {
        Duration::from_secs(self.jar_expiration_seconds)
    }
}
