//! Test fixtures - in-memory .nupkg artifacts and fake registries.

#![allow(dead_code)]

use nupkg_fetch::{
    ArtifactFetcher, DownloadObserver, FetchError, PackageId, RegistryUrls, Result, UrlBuilder,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// Shorthand for building ids in tests.
pub fn pkg(name: &str, version: Option<&str>) -> PackageId {
    PackageId::new(name, version).unwrap()
}

/// A nuspec document declaring `deps` in a single flat `<dependencies>` list.
pub fn nuspec(id: &PackageId, deps: &[&PackageId]) -> String {
    let body: String = deps.iter().map(|d| dependency_element(d)).collect();
    nuspec_with_body(id, &body)
}

/// A nuspec document whose `<dependencies>` element contains `body` verbatim.
pub fn nuspec_with_body(id: &PackageId, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>{}</id>
    <version>{}</version>
    <authors>test</authors>
    <dependencies>{}</dependencies>
  </metadata>
</package>"#,
        id.name(),
        id.version().unwrap_or("1.0.0"),
        body
    )
}

pub fn dependency_element(dep: &PackageId) -> String {
    match dep.version() {
        Some(v) => format!(r#"<dependency id="{}" version="{}" />"#, dep.name(), v),
        None => format!(r#"<dependency id="{}" />"#, dep.name()),
    }
}

/// Zip bytes of a package containing `manifest` plus some filler entries.
pub fn nupkg_from_manifest(name: &str, manifest: &str) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types />").unwrap();
    zip.start_file(format!("{}.nuspec", name), options).unwrap();
    zip.write_all(manifest.as_bytes()).unwrap();
    zip.start_file(format!("lib/netstandard2.0/{}.dll", name), options)
        .unwrap();
    zip.write_all(b"MZ fake assembly").unwrap();

    zip.finish().unwrap().into_inner()
}

/// Zip bytes of a package declaring `deps`.
pub fn nupkg(id: &PackageId, deps: &[&PackageId]) -> Vec<u8> {
    nupkg_from_manifest(id.name(), &nuspec(id, deps))
}

/// Registry that serves pre-built artifacts from memory and records every fetch.
#[derive(Default)]
pub struct MemoryRegistry {
    artifacts: HashMap<PackageId, Vec<u8>>,
    pub fetched: RefCell<Vec<PackageId>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `id` with the given direct dependencies.
    pub fn publish(mut self, id: &PackageId, deps: &[&PackageId]) -> Self {
        self.artifacts.insert(id.clone(), nupkg(id, deps));
        self
    }

    /// Publish `id` with raw artifact bytes.
    pub fn publish_raw(mut self, id: &PackageId, bytes: Vec<u8>) -> Self {
        self.artifacts.insert(id.clone(), bytes);
        self
    }

    pub fn fetch_count(&self, id: &PackageId) -> usize {
        self.fetched.borrow().iter().filter(|p| *p == id).count()
    }
}

impl ArtifactFetcher for &MemoryRegistry {
    fn fetch(&self, id: &PackageId, target: &Path) -> Result<u64> {
        if target.exists() {
            return Err(FetchError::AlreadyExists(target.to_path_buf()));
        }
        self.fetched.borrow_mut().push(id.clone());

        let bytes = self.artifacts.get(id).ok_or_else(|| FetchError::Transport {
            url: RegistryUrls::default().download_url(id),
            message: "package not found on registry (HTTP 404)".to_string(),
        })?;
        std::fs::write(target, bytes)?;
        Ok(bytes.len() as u64)
    }
}

/// One observed traversal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Downloading(PackageId, PathBuf),
    Downloaded(PackageId),
    Skipped(PackageId),
    Resolved(PackageId, Vec<PackageId>),
}

/// Observer that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<Event>,
}

impl RecordingObserver {
    pub fn skipped(&self) -> Vec<&PackageId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Skipped(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn resolved(&self) -> Vec<(&PackageId, &[PackageId])> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Resolved(id, deps) => Some((id, deps.as_slice())),
                _ => None,
            })
            .collect()
    }
}

impl DownloadObserver for RecordingObserver {
    fn downloading(&mut self, id: &PackageId, target: &Path) {
        self.events
            .push(Event::Downloading(id.clone(), target.to_path_buf()));
    }

    fn downloaded(&mut self, id: &PackageId, _bytes: u64) {
        self.events.push(Event::Downloaded(id.clone()));
    }

    fn skipped(&mut self, id: &PackageId) {
        self.events.push(Event::Skipped(id.clone()));
    }

    fn resolved(&mut self, id: &PackageId, dependencies: &[PackageId]) {
        self.events
            .push(Event::Resolved(id.clone(), dependencies.to_vec()));
    }
}

/// Names of all files in `dir`, sorted.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
