//! Repository path parsing.
//!
//! Paths are matched against the repository layout, for example
//! `io/papermc/hangar/paper/Maintenance/4.2.1/Maintenance-4.2.1.pom` or
//! `com/modrinth/fabric/fabric-api/maven-metadata.xml`.

use crate::hangar::Platform;
use crate::modrinth::Loader;
use core::fmt;
use core::str::FromStr;
use strum::IntoEnumIterator;

const METADATA_FILE: &str = "maven-metadata.xml";
const HANGAR_PREFIX: [&str; 3] = ["io", "papermc", "hangar"];
const MODRINTH_PREFIX: [&str; 2] = ["com", "modrinth"];

/// Which upstream a path addresses, with its group qualifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Hangar { platform: Platform, channel: Option<String> },
    Modrinth { loader: Loader },
}

/// The kind of file a path asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Metadata,
    Pom { version: String, file_stem: String },
    Jar { version: String, file_stem: String },
}

/// A parsed repository request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    pub source: Source,

    /// Hangar slug or Modrinth project id/slug.
    pub project: String,

    pub artifact: Artifact,
}

/// Why a path could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path does not match any route.
    UnknownRoute(String),

    /// The route matched but names a platform Hangar is not served for.
    UnsupportedPlatform(String),

    /// The route matched but names a loader Modrinth is not served for.
    UnsupportedLoader(String),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRoute(path) => write!(f, "no artifact at '{path}'"),
            Self::UnsupportedPlatform(platform) => {
                let supported: Vec<&str> = Platform::iter().map(Platform::as_str).collect();
                write!(f, "unsupported platform '{platform}', expected one of: {}", supported.join(", "))
            }
            Self::UnsupportedLoader(loader) => {
                let supported: Vec<&str> = Loader::iter().map(Loader::as_str).collect();
                write!(f, "unsupported loader '{loader}', expected one of: {}", supported.join(", "))
            }
        }
    }
}

impl core::error::Error for PathError {}

impl RepositoryPath {
    /// Parse a request path. A leading `/` and `repository/` prefix are accepted.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let trimmed = path.trim_start_matches('/');
        let trimmed = trimmed.strip_prefix("repository/").unwrap_or(trimmed);

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PathError::UnknownRoute(path.to_string()));
        }

        if let Some(rest) = segments.strip_prefix(HANGAR_PREFIX.as_slice()) {
            return parse_hangar(rest).ok_or_else(|| PathError::UnknownRoute(path.to_string()))?;
        }

        if let Some(rest) = segments.strip_prefix(MODRINTH_PREFIX.as_slice()) {
            return parse_modrinth(rest).ok_or_else(|| PathError::UnknownRoute(path.to_string()))?;
        }

        Err(PathError::UnknownRoute(path.to_string()))
    }
}

/// Outer `None` means no route matched.
fn parse_hangar(rest: &[&str]) -> Option<Result<RepositoryPath, PathError>> {
    let (platform, channel, project, artifact) = match *rest {
        [platform, project, METADATA_FILE] => (platform, None, project, Artifact::Metadata),
        [platform, channel, project, METADATA_FILE] => (platform, Some(channel), project, Artifact::Metadata),
        [platform, project, version, file] => (platform, None, project, parse_file(version, file)?),
        [platform, channel, project, version, file] => (platform, Some(channel), project, parse_file(version, file)?),
        _ => return None,
    };

    let Ok(platform) = Platform::from_str(platform) else {
        return Some(Err(PathError::UnsupportedPlatform(platform.to_string())));
    };

    Some(Ok(RepositoryPath {
        source: Source::Hangar {
            platform,
            channel: channel.map(str::to_string),
        },
        project: project.to_string(),
        artifact,
    }))
}

fn parse_modrinth(rest: &[&str]) -> Option<Result<RepositoryPath, PathError>> {
    let (loader, project, artifact) = match *rest {
        [loader, project, METADATA_FILE] => (loader, project, Artifact::Metadata),
        [loader, project, version, file] => (loader, project, parse_file(version, file)?),
        _ => return None,
    };

    let Ok(loader) = Loader::from_str(loader) else {
        return Some(Err(PathError::UnsupportedLoader(loader.to_string())));
    };

    Some(Ok(RepositoryPath {
        source: Source::Modrinth { loader },
        project: project.to_string(),
        artifact,
    }))
}

fn parse_file(version: &str, file: &str) -> Option<Artifact> {
    if let Some(stem) = file.strip_suffix(".pom") {
        return Some(Artifact::Pom {
            version: version.to_string(),
            file_stem: stem.to_string(),
        });
    }

    file.strip_suffix(".jar").map(|stem| Artifact::Jar {
        version: version.to_string(),
        file_stem: stem.to_string(),
    })
}
