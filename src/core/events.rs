//! Traversal events
//!
//! The downloader never prints. It reports what it is doing to a
//! [`DownloadObserver`]; the CLI plugs in [`ConsoleObserver`], quiet runs
//! and tests use [`NullObserver`] or their own recorder.

use std::path::Path;

use super::output;
use super::package::PackageId;

/// Sink for semantic progress events emitted during a traversal.
///
/// All methods default to no-ops so observers only implement what they need.
pub trait DownloadObserver {
    /// A package is about to be fetched to `target`.
    fn downloading(&mut self, _id: &PackageId, _target: &Path) {}

    /// A package was written to disk.
    fn downloaded(&mut self, _id: &PackageId, _bytes: u64) {}

    /// A package was reached again and will not be fetched a second time.
    fn skipped(&mut self, _id: &PackageId) {}

    /// Direct dependencies of `id`. Never called with an empty list.
    fn resolved(&mut self, _id: &PackageId, _dependencies: &[PackageId]) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl DownloadObserver for NullObserver {}

/// Renders events to the terminal through [`output`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print the target path of each download.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl DownloadObserver for ConsoleObserver {
    fn downloading(&mut self, id: &PackageId, target: &Path) {
        output::action(&format!("Downloading {}", id));
        if self.verbose {
            output::detail(&format!("-> {}", target.display()));
        }
    }

    fn downloaded(&mut self, id: &PackageId, bytes: u64) {
        output::detail(&format!("saved {} ({} bytes)", id.file_name(), bytes));
    }

    fn skipped(&mut self, id: &PackageId) {
        output::skip(&format!("{} already downloaded, skipping", id));
    }

    fn resolved(&mut self, id: &PackageId, dependencies: &[PackageId]) {
        output::detail(&format!(
            "{} has {} direct dependenc{}",
            id,
            dependencies.len(),
            if dependencies.len() == 1 { "y" } else { "ies" }
        ));
        for dep in dependencies {
            output::sub_action(&dep.to_string());
        }
    }
}

impl<O: DownloadObserver + ?Sized> DownloadObserver for &mut O {
    fn downloading(&mut self, id: &PackageId, target: &Path) {
        (**self).downloading(id, target);
    }

    fn downloaded(&mut self, id: &PackageId, bytes: u64) {
        (**self).downloaded(id, bytes);
    }

    fn skipped(&mut self, id: &PackageId) {
        (**self).skipped(id);
    }

    fn resolved(&mut self, id: &PackageId, dependencies: &[PackageId]) {
        (**self).resolved(id, dependencies);
    }
}
