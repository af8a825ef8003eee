//! POM generation.

use super::coordinate::Coordinate;
use super::xml::write_element;
use crate::Result;
use crate::{hangar, modrinth};
use core::fmt::Write;

const PROJECT_OPEN: &str = r#"<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">"#;

/// One `<dependency>` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PomDependency<'a> {
    pub group_id: &'a str,
    pub artifact_id: &'a str,
    pub version: &'a str,
}

/// Hangar dependencies already name a full coordinate.
pub fn hangar_dependencies(dependencies: &[hangar::Dependency]) -> impl Iterator<Item = PomDependency<'_>> {
    dependencies.iter().map(|d| PomDependency {
        group_id: &d.namespace,
        artifact_id: &d.name,
        version: &d.version,
    })
}

/// Expanded Modrinth dependencies, placed under `group_id`. Unexpanded references are skipped.
pub fn modrinth_dependencies<'a>(group_id: &'a str, dependencies: &'a [modrinth::ResolvedDependency]) -> impl Iterator<Item = PomDependency<'a>> {
    dependencies
        .iter()
        .filter_map(modrinth::ResolvedDependency::as_expanded)
        .map(move |e| PomDependency {
            group_id,
            artifact_id: e.project_id(),
            version: e.version_number(),
        })
}

/// Write the POM for `coordinate` declaring `dependencies` in the given order.
pub fn generate<'a, W: Write>(coordinate: &Coordinate, dependencies: impl IntoIterator<Item = PomDependency<'a>>, writer: &mut W) -> Result<()> {
    writeln!(writer, "{PROJECT_OPEN}")?;
    write_element(writer, 1, "modelVersion", "4.0.0")?;
    write_element(writer, 1, "groupId", &coordinate.group_id)?;
    write_element(writer, 1, "artifactId", &coordinate.artifact_id)?;
    write_element(writer, 1, "version", &coordinate.version)?;
    writeln!(writer, "  <dependencies>")?;
    for dependency in dependencies {
        writeln!(writer, "    <dependency>")?;
        write_element(writer, 3, "groupId", dependency.group_id)?;
        write_element(writer, 3, "artifactId", dependency.artifact_id)?;
        write_element(writer, 3, "version", dependency.version)?;
        writeln!(writer, "    </dependency>")?;
    }
    writeln!(writer, "  </dependencies>")?;
    write!(writer, "</project>")?;

    Ok(())
}

/// Render the POM to a string.
pub fn render<'a>(coordinate: &Coordinate, dependencies: impl IntoIterator<Item = PomDependency<'a>>) -> Result<String> {
    let mut out = String::new();
    generate(coordinate, dependencies, &mut out)?;
    Ok(out)
}
