//! Hangar (PaperMC's plugin registry) API provider.

mod models;
mod provider;

pub use models::{Channel, Dependency, Pagination, Platform, Project, ProjectNamespace, Version, VersionsPage};
pub use provider::{PROJECT_CACHE, Provider, VERSION_CACHE};
