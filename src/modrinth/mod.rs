//! Modrinth API provider.
//!
//! Modrinth embeds dependencies as shallow references (a project id and an optional pinned version
//! id). [`Provider::get_version`] fetches the pinned versions so that documents can name full
//! coordinates, producing a [`ResolvedVersion`] whose entries are either [`ExpandedDependency`]
//! values or the untouched references.

mod models;
mod provider;

pub use models::{
    Dependency, DependencyType, ExpandedDependency, File, FileHashes, Loader, Project, ResolvedDependency, ResolvedVersion, Version,
    VersionType,
};
pub use provider::{PROJECT_CACHE, Provider, VERSION_CACHE};
