//! Configuration loading from environment variables and an optional TOML file.
//!
//! Values come from `FORMGATE_*` environment variables with sensible
//! defaults. Invalid numeric values fall back to defaults without failing.
//! When a TOML file is given, its values are applied first and environment
//! variables override them.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `FORMGATE_BLOCKLIST_PATH` | unset | Comma-separated blocklist file |
//! | `FORMGATE_CATALOG_PATH` | unset | Switch record file seeding the catalog |
//! | `FORMGATE_ERROR_PAGE_PATH` | unset | Body of rejection responses |
//! | `FORMGATE_MAX_BODY_BYTES` | 2097152 | Largest form body buffered (floor 1024) |
//! | `FORMGATE_BLOCKLIST_CACHE_SECS` | 0 | Blocklist cache TTL, 0 = re-read per request |
//! | `FORMGATE_LOG_LEVEL` | info | Log filter directive |
//! | `FORMGATE_LOG_FORMAT` | json | `json` or `pretty` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{FilterConfig, DEFAULT_MAX_BODY_BYTES};
use crate::telemetry::{LogConfig, LogFormat};

/// Smallest accepted body limit.
pub const MIN_MAX_BODY_BYTES: usize = 1024;

/// Errors reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Everything needed to wire a filter.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub blocklist_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub error_page_path: Option<PathBuf>,
    pub filter: FilterConfig,
    /// Zero keeps the re-read-per-request behavior.
    pub blocklist_cache_ttl: Duration,
    pub log: LogConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            blocklist_path: None,
            catalog_path: None,
            error_page_path: None,
            filter: FilterConfig::default(),
            blocklist_cache_ttl: Duration::ZERO,
            log: LogConfig::default(),
        }
    }
}

/// On-disk configuration. Keys mirror the environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub blocklist_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub error_page_path: Option<PathBuf>,
    pub max_body_bytes: Option<usize>,
    pub blocklist_cache_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

/// Printable summary of the effective configuration.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub blocklist_path: Option<String>,
    pub catalog_path: Option<String>,
    pub error_page_path: Option<String>,
    pub max_body_bytes: usize,
    pub blocklist_cache_secs: u64,
    pub log_level: String,
    pub log_format: String,
}

/// Parse a `usize` env var, returning `None` on missing or invalid.
fn parse_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok()?.trim().parse::<usize>().ok()
}

/// Parse a `u64` env var, returning `None` on missing or invalid.
fn parse_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse::<u64>().ok()
}

/// Read a path env var; empty values count as unset.
fn parse_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn apply_max_body(config: &mut GateConfig, value: usize) {
    config.filter.max_body_bytes = value.max(MIN_MAX_BODY_BYTES);
}

fn apply_env(config: &mut GateConfig) {
    if let Some(path) = parse_path("FORMGATE_BLOCKLIST_PATH") {
        config.blocklist_path = Some(path);
    }
    if let Some(path) = parse_path("FORMGATE_CATALOG_PATH") {
        config.catalog_path = Some(path);
    }
    if let Some(path) = parse_path("FORMGATE_ERROR_PAGE_PATH") {
        config.error_page_path = Some(path);
    }
    if let Some(bytes) = parse_usize("FORMGATE_MAX_BODY_BYTES") {
        apply_max_body(config, bytes);
    }
    if let Some(secs) = parse_u64("FORMGATE_BLOCKLIST_CACHE_SECS") {
        config.blocklist_cache_ttl = Duration::from_secs(secs);
    }
    if let Ok(level) = std::env::var("FORMGATE_LOG_LEVEL") {
        if !level.trim().is_empty() {
            config.log.level = level;
        }
    }
    if let Some(format) = std::env::var("FORMGATE_LOG_FORMAT")
        .ok()
        .and_then(|f| f.parse::<LogFormat>().ok())
    {
        config.log.format = format;
    }
}

fn apply_file(config: &mut GateConfig, file: FileConfig) {
    if file.blocklist_path.is_some() {
        config.blocklist_path = file.blocklist_path;
    }
    if file.catalog_path.is_some() {
        config.catalog_path = file.catalog_path;
    }
    if file.error_page_path.is_some() {
        config.error_page_path = file.error_page_path;
    }
    if let Some(bytes) = file.max_body_bytes {
        apply_max_body(config, bytes);
    }
    if let Some(secs) = file.blocklist_cache_secs {
        config.blocklist_cache_ttl = Duration::from_secs(secs);
    }
    if let Some(level) = file.log_level {
        config.log.level = level;
    }
    if let Some(format) = file.log_format.and_then(|f| f.parse::<LogFormat>().ok()) {
        config.log.format = format;
    }
}

/// Load configuration from environment variables only.
pub fn load() -> GateConfig {
    let mut config = GateConfig::default();
    apply_env(&mut config);
    config
}

/// Parse a TOML configuration document.
pub fn parse_file_config(content: &str, path: &Path) -> Result<FileConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load `path` as TOML, then apply environment overrides.
pub fn load_with_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = parse_file_config(&content, path)?;

    let mut config = GateConfig::default();
    apply_file(&mut config, file);
    apply_env(&mut config);
    Ok(config)
}

impl GateConfig {
    /// Return a serializable summary of all effective values.
    pub fn effective_config(&self) -> EffectiveConfig {
        let show = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        EffectiveConfig {
            blocklist_path: show(&self.blocklist_path),
            catalog_path: show(&self.catalog_path),
            error_page_path: show(&self.error_page_path),
            max_body_bytes: self.filter.max_body_bytes,
            blocklist_cache_secs: self.blocklist_cache_ttl.as_secs(),
            log_level: self.log.level.clone(),
            log_format: self.log.format.as_str().to_string(),
        }
    }
}
