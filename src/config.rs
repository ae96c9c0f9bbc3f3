//! Application-level configuration loading: report sizes, release year typing and static assets.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::models::ReleaseYearKind;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_CATALOG_CONFIG_PATH";
/// Environment variable selecting the storage backend.
const STORAGE_BACKEND_ENV: &str = "STORAGE_BACKEND";
const DEFAULT_REPORT_LIMIT: usize = 10;
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Number of games returned by the top/worst rated reports.
    pub report_limit: usize,
    /// Canonical type of `release_year` for writes and exact filters.
    pub release_year_kind: ReleaseYearKind,
    /// Directory served at `/` for the browser page.
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        report_limit = app_config.report_limit,
                        release_year_kind = ?app_config.release_year_kind,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON configuration document; missing keys keep their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            report_limit: DEFAULT_REPORT_LIMIT,
            release_year_kind: ReleaseYearKind::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    report_limit: Option<usize>,
    #[serde(default)]
    release_year_kind: Option<ReleaseYearKind>,
    #[serde(default)]
    static_dir: Option<PathBuf>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            report_limit: value
                .report_limit
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.report_limit),
            release_year_kind: value
                .release_year_kind
                .unwrap_or(defaults.release_year_kind),
            static_dir: value.static_dir.unwrap_or(defaults.static_dir),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Which [`GameStore`](crate::dao::game_store::GameStore) implementation the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    /// Read [`STORAGE_BACKEND_ENV`]; anything other than `memory` selects MongoDB.
    pub fn from_env() -> Self {
        Self::parse(env::var(STORAGE_BACKEND_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            _ => StorageBackend::Mongo,
        }
    }
}
