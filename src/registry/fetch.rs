//! Artifact download
//!
//! Streams a registry response into a temporary file next to the target
//! and renames it into place only once the whole body has arrived, so a
//! failed transfer never leaves a truncated `.nupkg` behind.

use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;

use super::url::{RegistryUrls, UrlBuilder};
use crate::core::config::{Config, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::core::error::{FetchError, Result};
use crate::core::output::{self, ProgressGuard};
use crate::core::package::PackageId;

const USER_AGENT: &str = concat!("nupkg-fetch/", env!("CARGO_PKG_VERSION"));

/// Obtains the artifact for a package and writes it to a path.
pub trait ArtifactFetcher {
    /// Write the artifact for `id` to `target`, returning the number of bytes written.
    ///
    /// Fails with [`FetchError::AlreadyExists`] if `target` exists; nothing is
    /// ever overwritten.
    fn fetch(&self, id: &PackageId, target: &Path) -> Result<u64>;
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher<U = RegistryUrls> {
    urls: U,
    agent: ureq::Agent,
    show_progress: bool,
}

impl HttpFetcher<RegistryUrls> {
    /// Fetcher for the registry and timeout in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_timeout(RegistryUrls::new(config.registry.clone()), config.timeout)
    }
}

impl<U: UrlBuilder> HttpFetcher<U> {
    pub fn new(urls: U) -> Self {
        Self::with_timeout(urls, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    pub fn with_timeout(urls: U, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            urls,
            agent,
            show_progress: false,
        }
    }

    /// Draw a progress bar while downloading.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn urls(&self) -> &U {
        &self.urls
    }
}

impl<U: UrlBuilder> ArtifactFetcher for HttpFetcher<U> {
    fn fetch(&self, id: &PackageId, target: &Path) -> Result<u64> {
        if target.exists() {
            return Err(FetchError::AlreadyExists(target.to_path_buf()));
        }

        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !dir.is_dir() {
            return Err(FetchError::not_found("target directory", dir));
        }

        let url = self.urls.download_url(id);
        let response = self
            .agent
            .get(&url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| transport_error(&url, e))?;

        let pb = if self.show_progress {
            output::download_spinner(&format!("downloading {}", id.file_name()))
        } else {
            output::hidden_progress()
        };
        let _guard = ProgressGuard::new(&pb);

        if let Some(len) = response
            .header("content-length")
            .and_then(|s| s.parse().ok())
        {
            output::upgrade_to_bytes(&pb, len);
        }

        let mut tmp = NamedTempFile::new_in(dir)?;
        let mut reader = response.into_reader();
        let mut buffer = [0u8; 8192];
        let mut total_bytes = 0u64;

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: format!("read error: {}", e),
            })?;

            if bytes_read == 0 {
                break;
            }

            tmp.write_all(&buffer[..bytes_read])?;
            total_bytes += bytes_read as u64;
            pb.set_position(total_bytes);
        }
        tmp.flush()?;

        tmp.persist_noclobber(target).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                FetchError::AlreadyExists(target.to_path_buf())
            } else {
                FetchError::Io(e.error)
            }
        })?;

        Ok(total_bytes)
    }
}

fn transport_error(url: &str, err: ureq::Error) -> FetchError {
    let message = match err {
        ureq::Error::Status(404, _) => "package not found on registry (HTTP 404)".to_string(),
        ureq::Error::Status(code, _) => format!("registry returned HTTP {}", code),
        ureq::Error::Transport(t) => t.to_string(),
    };
    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
