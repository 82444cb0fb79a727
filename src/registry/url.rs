//! Download URL construction

use crate::core::config::DEFAULT_REGISTRY;
use crate::core::package::PackageId;

/// Maps a package identifier to the URL its artifact is served from.
pub trait UrlBuilder {
    fn download_url(&self, id: &PackageId) -> String;
}

/// NuGet v2 style URLs: `<base>/<name>` or `<base>/<name>/<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUrls {
    base: String,
}

impl RegistryUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for RegistryUrls {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY)
    }
}

impl UrlBuilder for RegistryUrls {
    fn download_url(&self, id: &PackageId) -> String {
        match id.version() {
            Some(version) => format!("{}/{}/{}", self.base, id.name(), version),
            None => format!("{}/{}", self.base, id.name()),
        }
    }
}
