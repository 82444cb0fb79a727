//! Recursive package download
//!
//! Walks the dependency graph depth-first with an explicit stack, so deep
//! chains never grow the call stack. Every package is fetched at most
//! once: it enters the visited set as soon as its artifact is written and
//! before its dependencies are looked at, which makes a cycle back to an
//! ancestor a plain "already downloaded" skip.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::error::{FetchError, Result};
use super::events::DownloadObserver;
use super::package::PackageId;
use crate::registry::{ArtifactFetcher, DependencyExtractor};

/// Outcome of a successful [`RecursiveDownloader::download_all`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Packages written to disk, in download order.
    pub downloaded: Vec<(PackageId, PathBuf)>,
    /// How many times an already downloaded package was reached again.
    pub skipped: usize,
    /// Total bytes written.
    pub bytes: u64,
}

impl DownloadReport {
    /// Written artifact paths, in download order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.downloaded.iter().map(|(_, p)| p.as_path())
    }
}

/// Per-invocation traversal state. Never outlives one `download_all` call.
struct Traversal {
    visited: HashSet<PackageId>,
    stack: Vec<PackageId>,
    report: DownloadReport,
}

impl Traversal {
    fn new(root: PackageId) -> Self {
        Self {
            visited: HashSet::new(),
            stack: vec![root],
            report: DownloadReport::default(),
        }
    }

    /// Schedule `deps` so they are processed in the given order.
    fn push_all(&mut self, deps: Vec<PackageId>) {
        self.stack.extend(deps.into_iter().rev());
    }
}

/// Downloads a package and, transitively, everything it depends on.
pub struct RecursiveDownloader<F, E, O> {
    fetcher: F,
    extractor: E,
    observer: O,
}

impl<F, E, O> RecursiveDownloader<F, E, O>
where
    F: ArtifactFetcher,
    E: DependencyExtractor,
    O: DownloadObserver,
{
    pub fn new(fetcher: F, extractor: E, observer: O) -> Self {
        Self {
            fetcher,
            extractor,
            observer,
        }
    }

    /// Download `root` and all of its transitive dependencies into `target_dir`.
    ///
    /// `target_dir` must already exist. The first fetch or extraction error
    /// aborts the run; artifacts written before it stay on disk.
    pub fn download_all(&mut self, root: &PackageId, target_dir: &Path) -> Result<DownloadReport> {
        if !target_dir.is_dir() {
            return Err(FetchError::not_found("target directory", target_dir));
        }

        let mut walk = Traversal::new(root.clone());

        while let Some(id) = walk.stack.pop() {
            let target = id.target_path(target_dir);

            if walk.visited.contains(&id) {
                self.observer.skipped(&id);
                walk.report.skipped += 1;
                continue;
            }

            self.observer.downloading(&id, &target);
            let bytes = self.fetcher.fetch(&id, &target)?;
            walk.visited.insert(id.clone());
            self.observer.downloaded(&id, bytes);
            walk.report.bytes += bytes;

            let deps = self.extractor.extract(&target)?;
            if !deps.is_empty() {
                self.observer.resolved(&id, &deps);
            }

            walk.report.downloaded.push((id, target));
            walk.push_all(deps);
        }

        Ok(walk.report)
    }
}
