//! Runtime configuration
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. `nupkg-fetch/config.toml` in each `$XDG_CONFIG_DIRS` entry (default `/etc/xdg`)
//! 3. `nupkg-fetch/config.toml` in `$XDG_CONFIG_HOME`
//! 4. `NUPKG_REGISTRY` / `NUPKG_HTTP_TIMEOUT`
//! 5. explicit overrides (command line)
//!
//! ```toml
//! registry = "https://www.nuget.org/api/v2/package"
//! timeout_secs = 60
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{FetchError, Result};

/// Default package download endpoint.
pub const DEFAULT_REGISTRY: &str = "https://www.nuget.org/api/v2/package";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const MIN_TIMEOUT_SECS: u64 = 5;
const MAX_TIMEOUT_SECS: u64 = 300;

pub const REGISTRY_ENV: &str = "NUPKG_REGISTRY";
pub const TIMEOUT_ENV: &str = "NUPKG_HTTP_TIMEOUT";

const CONFIG_DIR_NAME: &str = "nupkg-fetch";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    registry: Option<String>,
    timeout_secs: Option<u64>,
}

impl ConfigToml {
    fn merge(&mut self, other: ConfigToml) {
        if other.registry.is_some() {
            self.registry = other.registry;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
    }
}

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub registry: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Values that override every other layer when set.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registry: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from config files, environment and `overrides`.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut layered = ConfigToml::default();
        for path in find_config_files() {
            if path.is_file() {
                layered.merge(read_toml(&path)?);
            }
        }
        layered.merge(from_env()?);
        layered.merge(ConfigToml {
            registry: overrides.registry,
            timeout_secs: overrides.timeout_secs,
        });
        Self::resolve(layered)
    }

    /// Load configuration from a single file plus `overrides`, ignoring the
    /// environment and XDG lookup.
    pub fn from_file(path: &Path, overrides: Overrides) -> Result<Self> {
        let mut layered = read_toml(path)?;
        layered.merge(ConfigToml {
            registry: overrides.registry,
            timeout_secs: overrides.timeout_secs,
        });
        Self::resolve(layered)
    }

    fn resolve(cfg: ConfigToml) -> Result<Self> {
        let registry = cfg
            .registry
            .map(|r| r.trim().to_string())
            .unwrap_or_else(|| DEFAULT_REGISTRY.to_string());
        validate_registry(&registry)?;

        let secs = cfg
            .timeout_secs
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);

        Ok(Self {
            registry,
            timeout: Duration::from_secs(secs),
        })
    }
}

fn validate_registry(url: &str) -> Result<()> {
    let lower = url.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(());
    }
    Err(FetchError::InvalidArgument(format!(
        "registry URL must use http:// or https://, got: {}",
        url
    )))
}

fn from_env() -> Result<ConfigToml> {
    let registry = std::env::var(REGISTRY_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty());

    let timeout_secs = match std::env::var(TIMEOUT_ENV) {
        Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|_| {
            FetchError::InvalidArgument(format!("{} must be a number of seconds, got: {}", TIMEOUT_ENV, raw))
        })?),
        _ => None,
    };

    Ok(ConfigToml {
        registry,
        timeout_secs,
    })
}

fn split_xdg_config_dirs() -> Vec<PathBuf> {
    let raw = std::env::var("XDG_CONFIG_DIRS").unwrap_or_else(|_| "/etc/xdg".to_owned());
    raw.split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn xdg_config_home() -> PathBuf {
    if let Ok(raw) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".").join(".config"))
}

fn find_config_files() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = split_xdg_config_dirs()
        .into_iter()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .collect();
    paths.push(xdg_config_home().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    paths
}

fn read_toml(path: &Path) -> Result<ConfigToml> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| FetchError::not_found("config file", path))?;
    toml::from_str::<ConfigToml>(&text).map_err(|e| {
        FetchError::InvalidArgument(format!("invalid TOML in {}: {}", path.display(), e))
    })
}
