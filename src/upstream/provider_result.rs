use std::sync::Arc;

/// Outcome of looking up a project or version on an upstream platform.
#[derive(Debug, Clone)]
pub enum ProviderResult<T> {
    /// The lookup succeeded and data was found.
    Found(T),

    /// The requested project does not exist upstream.
    ProjectNotFound,

    /// The project exists (or could not be told apart) but the requested version was not found.
    VersionNotFound,

    /// The upstream could not be queried or answered with something unexpected.
    Error(Arc<ohno::AppError>),
}

impl<T> ProviderResult<T> {
    /// Returns `true` for either not-found variant.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound | Self::VersionNotFound)
    }

    /// Maps the found value, leaving the other variants untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderResult<U> {
        match self {
            Self::Found(data) => ProviderResult::Found(f(data)),
            Self::ProjectNotFound => ProviderResult::ProjectNotFound,
            Self::VersionNotFound => ProviderResult::VersionNotFound,
            Self::Error(e) => ProviderResult::Error(e),
        }
    }

    /// Returns a string describing the status of this result.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "Found",
            Self::ProjectNotFound => "ProjectNotFound",
            Self::VersionNotFound => "VersionNotFound",
            Self::Error(_) => "Error",
        }
    }
}
