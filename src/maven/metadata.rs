//! `maven-metadata.xml` generation.

use super::xml::write_element;
use crate::Result;
use crate::{hangar, modrinth};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core::fmt::Write;
use ohno::{IntoAppError, bail};

/// Format Maven uses for `lastUpdated`.
const LAST_UPDATED_FORMAT: &str = "%Y%m%d%H%M%S";

/// A version as it appears in a metadata listing.
pub trait ListedVersion {
    /// The version string build tools request artifacts by.
    fn version_name(&self) -> &str;

    /// Publication timestamp as reported upstream.
    fn published(&self) -> Option<&str>;
}

impl ListedVersion for hangar::Version {
    fn version_name(&self) -> &str {
        &self.name
    }

    fn published(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
}

impl ListedVersion for modrinth::Version {
    fn version_name(&self) -> &str {
        &self.version_number
    }

    fn published(&self) -> Option<&str> {
        self.date_published.as_deref()
    }
}

/// Parse an upstream timestamp into naive wall-clock time.
///
/// A trailing `Z` is dropped and the rest is read as an ISO-8601 date-time, with or without
/// fractional seconds. Timestamps carrying an explicit offset keep their wall-clock fields.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.strip_suffix('Z').unwrap_or(s);

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }

    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").into_app_err_with(|| format!("unable to parse timestamp '{s}'"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Format a timestamp as Maven's 14-digit `lastUpdated` value.
#[must_use]
pub fn last_updated(dt: NaiveDateTime) -> String {
    dt.format(LAST_UPDATED_FORMAT).to_string()
}

/// Write the metadata document listing `versions`, newest first.
///
/// `latest` and `release` both name `versions[0]`, whose timestamp also becomes `lastUpdated`.
/// Fails if `versions` is empty or the newest version's timestamp is missing or malformed.
pub fn generate<V, W>(group_id: &str, artifact_id: &str, versions: &[V], writer: &mut W) -> Result<()>
where
    V: ListedVersion,
    W: Write,
{
    let Some(newest) = versions.first() else {
        bail!("cannot generate metadata for '{artifact_id}' without versions");
    };

    let Some(published) = newest.published() else {
        bail!("version '{}' of '{artifact_id}' has no publication timestamp", newest.version_name());
    };

    let updated = last_updated(parse_timestamp(published)?);

    writeln!(writer, "<metadata>")?;
    write_element(writer, 1, "groupId", group_id)?;
    write_element(writer, 1, "artifactId", artifact_id)?;
    writeln!(writer, "  <versioning>")?;
    write_element(writer, 2, "latest", newest.version_name())?;
    write_element(writer, 2, "release", newest.version_name())?;
    writeln!(writer, "    <versions>")?;
    for version in versions {
        write_element(writer, 3, "version", version.version_name())?;
    }
    writeln!(writer, "    </versions>")?;
    write_element(writer, 2, "lastUpdated", &updated)?;
    writeln!(writer, "  </versioning>")?;
    write!(writer, "</metadata>")?;

    Ok(())
}

/// Render the metadata document to a string.
pub fn render<V: ListedVersion>(group_id: &str, artifact_id: &str, versions: &[V]) -> Result<String> {
    let mut out = String::new();
    generate(group_id, artifact_id, versions, &mut out)?;
    Ok(out)
}
