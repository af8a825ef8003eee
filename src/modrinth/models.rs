use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Mod loaders and server platforms a Modrinth version can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Loader {
    Paper,
    Velocity,
    Waterfall,
    Bungeecord,
    Minecraft,
    Fabric,
    Forge,
    Sponge,
    Folia,
    Quilt,
    Neoforge,
    Spigot,
    Bukkit,
    Purpur,
}

impl Loader {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Required,
    Optional,
    Incompatible,
    Embedded,

    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    Release,
    Beta,
    Alpha,

    #[default]
    #[serde(other)]
    Unknown,
}

/// A shallow dependency reference as Modrinth embeds it in a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(default)]
    pub version_id: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub file_name: Option<String>,

    pub dependency_type: DependencyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileHashes {
    #[serde(default)]
    pub sha1: String,

    #[serde(default)]
    pub sha512: String,
}

/// A downloadable file of a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub url: String,
    pub filename: String,

    #[serde(default)]
    pub hashes: FileHashes,

    #[serde(default)]
    pub primary: bool,

    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub file_type: Option<String>,
}

/// One published version of a Modrinth project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: String,
    pub project_id: String,

    #[serde(default)]
    pub author_id: Option<String>,

    pub name: String,
    pub version_number: String,

    #[serde(default)]
    pub changelog: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    #[serde(default)]
    pub game_versions: Vec<String>,

    #[serde(default)]
    pub version_type: VersionType,

    /// Loader names as reported, which may include loaders not modelled by [`Loader`].
    #[serde(default)]
    pub loaders: Vec<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub status: Option<String>,

    /// Publication timestamp exactly as reported, parsed only when a document needs it.
    #[serde(default)]
    pub date_published: Option<String>,

    #[serde(default)]
    pub downloads: u64,

    #[serde(default)]
    pub files: Vec<File>,
}

impl Version {
    /// Whether this version ships files for `loader`.
    #[must_use]
    pub fn supports(&self, loader: Loader) -> bool {
        self.loaders.iter().any(|l| l == loader.as_str())
    }

    /// The file to redirect downloads to, if the version marks one as primary.
    #[must_use]
    pub fn primary_file(&self) -> Option<&File> {
        self.files.iter().find(|f| f.primary)
    }
}

/// A Modrinth project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub project_type: Option<String>,

    #[serde(default)]
    pub loaders: Vec<String>,

    #[serde(default)]
    pub versions: Vec<String>,

    #[serde(default)]
    pub published: Option<String>,

    #[serde(default)]
    pub updated: Option<String>,
}

/// A version whose dependency list went through expansion.
///
/// The record's own dependency list is moved into `dependencies`, so `version.dependencies` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version: Version,
    pub dependencies: Vec<ResolvedDependency>,
}

/// Outcome of expanding one dependency reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDependency {
    /// The referenced version was fetched.
    Expanded(ExpandedDependency),

    /// The reference could not be expanded and is passed through unchanged.
    Unexpanded(Dependency),
}

impl ResolvedDependency {
    /// The reference this entry was produced from.
    #[must_use]
    pub const fn dependency(&self) -> &Dependency {
        match self {
            Self::Expanded(e) => &e.dependency,
            Self::Unexpanded(d) => d,
        }
    }

    #[must_use]
    pub const fn as_expanded(&self) -> Option<&ExpandedDependency> {
        match self {
            Self::Expanded(e) => Some(e),
            Self::Unexpanded(_) => None,
        }
    }
}

/// A dependency reference merged with the version record it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedDependency {
    dependency: Dependency,
    version: ResolvedVersion,
}

impl ExpandedDependency {
    /// Pair `dependency` with the fetched `version`.
    ///
    /// The dependency's pinned version must name the record, either by id or by version number,
    /// and the record must carry a version number. Otherwise the dependency is handed back.
    pub fn try_new(dependency: Dependency, version: ResolvedVersion) -> Result<Self, Dependency> {
        let pinned_matches = dependency
            .version_id
            .as_deref()
            .is_some_and(|pinned| pinned == version.version.id || pinned == version.version.version_number);

        if !pinned_matches || version.version.version_number.is_empty() {
            return Err(dependency);
        }

        Ok(Self { dependency, version })
    }

    #[must_use]
    pub const fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    #[must_use]
    pub const fn version(&self) -> &ResolvedVersion {
        &self.version
    }

    /// Project the expanded version belongs to.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.version.version.project_id
    }

    #[must_use]
    pub fn version_number(&self) -> &str {
        &self.version.version.version_number
    }
}
