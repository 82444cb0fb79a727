//! Registry access: download URLs, artifact fetching and manifest reading

pub mod fetch;
pub mod manifest;
pub mod url;

pub use fetch::{ArtifactFetcher, HttpFetcher};
pub use manifest::{DependencyExtractor, NuspecReader};
pub use url::{RegistryUrls, UrlBuilder};
