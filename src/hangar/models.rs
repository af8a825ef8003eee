use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Server platforms Hangar publishes plugin files for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Paper,
    Velocity,
    Waterfall,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Spelling the Hangar API expects in query parameters and download paths.
    #[must_use]
    pub const fn upstream_name(self) -> &'static str {
        match self {
            Self::Paper => "PAPER",
            Self::Velocity => "VELOCITY",
            Self::Waterfall => "WATERFALL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNamespace {
    pub owner: String,
    pub slug: String,
}

/// A Hangar project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub namespace: ProjectNamespace,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
}

/// A dependency as Hangar declares it, already a full coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

/// One published version of a Hangar project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub name: String,

    /// Creation timestamp exactly as reported, parsed only when a document needs it.
    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub visibility: Option<String>,

    #[serde(default)]
    pub channel: Option<Channel>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub count: u64,

    #[serde(default)]
    pub limit: u64,

    #[serde(default)]
    pub offset: u64,
}

/// Response body of the version listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionsPage {
    pub result: Vec<Version>,
    pub pagination: Pagination,
}
