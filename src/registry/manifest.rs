//! Dependency extraction from `.nupkg` artifacts
//!
//! A `.nupkg` is a zip archive holding exactly one `.nuspec` XML manifest.
//! Dependencies are `<dependency id=".." version=".."/>` elements, either
//! directly under `<dependencies>` or inside per-framework `<group>`
//! elements. Framework groups are flattened: the same id+version declared
//! for several frameworks is one dependency.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexSet;
use roxmltree::Document;

use crate::core::error::{FetchError, Result};
use crate::core::package::PackageId;

/// Manifest entry suffix (matched case-insensitively).
pub const MANIFEST_SUFFIX: &str = ".nuspec";

/// Largest manifest read out of an archive. Real nuspecs are a few KiB.
pub const MAX_NUSPEC_BYTES: u64 = 10 * 1024 * 1024;

/// Reads the direct dependencies declared by a downloaded artifact.
pub trait DependencyExtractor {
    /// Deduplicated direct dependencies of the artifact at `artifact`, in
    /// first-declared order.
    fn extract(&self, artifact: &Path) -> Result<Vec<PackageId>>;
}

/// Extractor for NuGet packages.
#[derive(Debug, Clone, Copy)]
pub struct NuspecReader {
    max_manifest_bytes: u64,
}

impl Default for NuspecReader {
    fn default() -> Self {
        Self {
            max_manifest_bytes: MAX_NUSPEC_BYTES,
        }
    }
}

impl NuspecReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject manifests larger than `bytes`.
    pub fn max_manifest_bytes(mut self, bytes: u64) -> Self {
        self.max_manifest_bytes = bytes;
        self
    }
}

impl DependencyExtractor for NuspecReader {
    fn extract(&self, artifact: &Path) -> Result<Vec<PackageId>> {
        let xml = read_manifest(artifact, self.max_manifest_bytes)?;
        parse_dependencies(&xml).map_err(|message| FetchError::parse(artifact, message))
    }
}

/// Read the single `.nuspec` entry of the archive as text, at most `limit` bytes.
fn read_manifest(artifact: &Path, limit: u64) -> Result<String> {
    if !artifact.is_file() {
        return Err(FetchError::not_found("package file", artifact));
    }

    let file = File::open(artifact)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| FetchError::parse(artifact, format!("not a zip archive: {}", e)))?;

    let candidates: Vec<String> = archive
        .file_names()
        .filter(|name| is_manifest_name(name))
        .map(str::to_string)
        .collect();

    let entry_name = match candidates.as_slice() {
        [single] => single.clone(),
        [] => return Err(FetchError::not_found("nuspec manifest in package", artifact)),
        many => {
            return Err(FetchError::not_found(
                format!("unique nuspec manifest (found {})", many.join(", ")),
                artifact,
            ));
        }
    };

    let entry = archive
        .by_name(&entry_name)
        .map_err(|e| FetchError::parse(artifact, format!("zip entry error: {}", e)))?;
    let mut xml = String::new();
    entry
        .take(limit.saturating_add(1))
        .read_to_string(&mut xml)
        .map_err(|e| FetchError::parse(artifact, format!("cannot read {}: {}", entry_name, e)))?;
    if xml.len() as u64 > limit {
        return Err(FetchError::parse(
            artifact,
            format!("{} exceeds {} bytes", entry_name, limit),
        ));
    }
    Ok(xml)
}

fn is_manifest_name(name: &str) -> bool {
    let suffix_len = MANIFEST_SUFFIX.len();
    name.len() >= suffix_len
        && name
            .get(name.len() - suffix_len..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(MANIFEST_SUFFIX))
}

/// Collect dependency declarations from nuspec XML.
///
/// Element names are matched on their local part so every nuspec schema
/// revision is accepted.
pub fn parse_dependencies(xml: &str) -> std::result::Result<Vec<PackageId>, String> {
    // Manifests written on Windows often start with a BOM.
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let document = Document::parse(xml).map_err(|e| format!("invalid nuspec XML: {}", e))?;

    let mut deps = IndexSet::new();
    for node in document
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "dependency")
    {
        let id = node
            .attribute("id")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                format!(
                    "dependency without id at byte {}",
                    node.range().start
                )
            })?;
        let version = node.attribute("version").map(str::trim);

        let dep = PackageId::new(id, version).map_err(|e| e.to_string())?;
        deps.insert(dep);
    }

    Ok(deps.into_iter().collect())
}
