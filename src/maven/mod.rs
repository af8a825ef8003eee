//! Maven repository naming and document synthesis.

pub mod coordinate;
pub mod group_id;
pub mod metadata;
pub mod pom;
mod xml;

pub use coordinate::{Coordinate, FilenameMismatch};
pub use xml::xml_escape;

/// Content type of generated documents.
pub const XML_CONTENT_TYPE: &str = "application/xml";
