use core::fmt;

/// A Maven coordinate: group, artifact, and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// A requested file name that does not belong to the coordinate it was requested under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMismatch {
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for FilenameMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file name '{}' does not match expected '{}'", self.actual, self.expected)
    }
}

impl core::error::Error for FilenameMismatch {}

impl Coordinate {
    #[must_use]
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// File name of this coordinate's artifacts, without extension.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.artifact_id, self.version)
    }

    /// Check that `stem`, a requested file name with its extension stripped, is `{artifact_id}-{version}`.
    pub fn validate_file_stem(&self, stem: &str) -> Result<(), FilenameMismatch> {
        let expected = self.file_stem();
        if stem == expected {
            Ok(())
        } else {
            Err(FilenameMismatch {
                expected,
                actual: stem.to_string(),
            })
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
