//! The Maven repository boundary.
//!
//! [`Repository`] takes a request path under the repository root and answers with a
//! [`RepositoryResponse`]: a synthesized `maven-metadata.xml` or POM, a redirect to the
//! upstream JAR, or an error status. It knows nothing about the transport that serves it.

mod handler;
pub mod path;
mod response;

pub use handler::{MaxAges, Method, Repository};
pub use path::{PathError, RepositoryPath};
pub use response::{RepositoryResponse, cache_control};
