//! Download a NuGet package together with everything it depends on
//!
//! Given a package id (and optionally a version), the artifact is fetched
//! from the registry, its `.nuspec` manifest is read straight out of the
//! downloaded `.nupkg`, and every declared dependency is fetched the same
//! way. Each distinct id+version is downloaded exactly once, so diamond and
//! cyclic dependency graphs are handled without special casing.
//!
//! Versions are taken literally as declared; no range resolution happens.
//!
//! # Example
//!
//! ```no_run
//! use nupkg_fetch::{Config, ConsoleObserver, HttpFetcher, NuspecReader, PackageId, RecursiveDownloader};
//! use std::path::Path;
//!
//! # fn main() -> nupkg_fetch::Result<()> {
//! let config = Config::default();
//! let fetcher = HttpFetcher::from_config(&config).show_progress(true);
//! let mut downloader = RecursiveDownloader::new(fetcher, NuspecReader::new(), ConsoleObserver::new());
//!
//! let root = PackageId::new("Serilog", Some("2.12.0"))?;
//! let report = downloader.download_all(&root, Path::new("./packages"))?;
//! println!("{} packages", report.downloaded.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Files
//!
//! Artifacts land directly in the target directory as
//! `<name>_<version>.nupkg`, or `<name>.nupkg` when no version was given.
//! Existing files are never overwritten.

mod core;
mod registry;

pub use crate::core::config::{self, Config, Overrides};
pub use crate::core::download::{DownloadReport, RecursiveDownloader};
pub use crate::core::error::{ErrorKind, FetchError, Result};
pub use crate::core::events::{ConsoleObserver, DownloadObserver, NullObserver};
pub use crate::core::output;
pub use crate::core::package::{PackageId, ARTIFACT_EXTENSION};
pub use crate::registry::manifest::parse_dependencies;
pub use crate::registry::{
    ArtifactFetcher, DependencyExtractor, HttpFetcher, NuspecReader, RegistryUrls, UrlBuilder,
};
