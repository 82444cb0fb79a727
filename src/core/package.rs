//! Package identity
//!
//! A [`PackageId`] is a name plus an optional, literal version string.
//! Versions are never interpreted: `1.0` and `1.0.0` are different
//! identities, and an unversioned id is distinct from every versioned one.

use std::fmt;
use std::path::{Path, PathBuf};

use super::error::{FetchError, Result};

/// File extension of downloaded artifacts.
pub const ARTIFACT_EXTENSION: &str = "nupkg";

/// Immutable package identifier used as the visited-set key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    name: String,
    version: Option<String>,
}

impl PackageId {
    /// Create an identifier.
    ///
    /// The name must be non-empty. Name and version end up in file names,
    /// so path separators and NUL bytes are rejected. Surrounding whitespace
    /// is trimmed from both; an empty version is treated as "no version".
    pub fn new(name: impl Into<String>, version: Option<impl Into<String>>) -> Result<Self> {
        let name: String = name.into();
        let name = name.trim().to_string();
        let version = version
            .map(|v| Into::<String>::into(v).trim().to_string())
            .filter(|v| !v.is_empty());

        if name.is_empty() {
            return Err(FetchError::InvalidArgument(
                "package name must not be empty".to_string(),
            ));
        }
        validate_segment("package name", &name)?;
        if let Some(v) = &version {
            validate_segment("package version", v)?;
        }

        Ok(Self { name, version })
    }

    /// Identifier without a version ("latest" on the registry).
    pub fn unversioned(name: impl Into<String>) -> Result<Self> {
        Self::new(name, None::<String>)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Deterministic artifact file name: `<name>[_<version>].nupkg`.
    pub fn file_name(&self) -> String {
        match &self.version {
            Some(v) => format!("{}_{}.{}", self.name, v, ARTIFACT_EXTENSION),
            None => format!("{}.{}", self.name, ARTIFACT_EXTENSION),
        }
    }

    /// Artifact path directly inside `dir`.
    pub fn target_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{} {}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

fn validate_segment(what: &str, value: &str) -> Result<()> {
    if value.contains(['/', '\\', '\0']) || value == "." || value == ".." {
        return Err(FetchError::InvalidArgument(format!(
            "{} contains invalid characters: {:?}",
            what, value
        )));
    }
    Ok(())
}
