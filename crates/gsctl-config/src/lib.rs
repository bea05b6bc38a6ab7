//! Shared configuration for the gsctl CLI.
//!
//! TOML defaults and per-switch profiles loaded through `figment`, plus the
//! on-disk [`FileTokenStore`] behind `gsctl_core::TokenStore`. The CLI layers
//! its flags on top of what is resolved here.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use gsctl_core::{SwitchModel, TokenStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Where session tokens are kept.
    pub token_dir: Option<PathBuf>,

    /// Per-switch settings, keyed by address.
    #[serde(default)]
    pub switches: HashMap<String, SwitchProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// Settings pinned for one switch.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SwitchProfile {
    /// Model name (e.g. "GS308EP"); skips detection at login.
    pub model: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

impl Config {
    /// The model pinned for `address`, if any.
    pub fn declared_model(&self, address: &str) -> Result<Option<SwitchModel>, ConfigError> {
        let Some(name) = self
            .switches
            .get(address.trim())
            .and_then(|profile| profile.model.as_deref())
        else {
            return Ok(None);
        };
        SwitchModel::from_str(name)
            .map(Some)
            .map_err(|_| ConfigError::Validation {
                field: format!("switches.\"{address}\".model"),
                reason: format!("unknown model '{name}'"),
            })
    }

    /// Timeout for `address` in seconds, falling back to the global default.
    pub fn timeout_for(&self, address: &str) -> u64 {
        self.switches
            .get(address.trim())
            .and_then(|profile| profile.timeout)
            .unwrap_or(self.defaults.timeout)
    }

    /// Configured token directory, or the platform default.
    pub fn token_dir(&self) -> PathBuf {
        self.token_dir.clone().unwrap_or_else(default_token_dir)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "gsctl", "gsctl")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || std::env::temp_dir().join("gsctl").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default token directory: the platform data dir, else `<temp>/gsctl`.
pub fn default_token_dir() -> PathBuf {
    project_dirs().map_or_else(
        || std::env::temp_dir().join("gsctl"),
        |dirs| dirs.data_dir().join("tokens"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment.
///
/// Environment variables use the `GSCTL_` prefix with `__` between nesting
/// levels, e.g. `GSCTL_TOKEN_DIR` or `GSCTL_DEFAULTS__TIMEOUT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GSCTL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Token files ─────────────────────────────────────────────────────

/// One file per switch under a token directory.
///
/// Files are named `token-<adler32(address) as 8 hex digits>` and hold the
/// encoded `<MODEL>:<token>` value.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Token file for `address`.
    pub fn path_for(&self, address: &str) -> PathBuf {
        let digest = adler2::adler32_slice(address.trim().as_bytes());
        self.dir.join(format!("token-{digest:08x}"))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, address: &str) -> io::Result<Option<String>> {
        let path = self.path_for(address);
        debug!(path = %path.display(), "reading session token");
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, address: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(address);
        debug!(path = %path.display(), "storing session token");
        write_private(&path, value)
    }
}

#[cfg(unix)]
fn write_private(path: &Path, value: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(value.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, value: &str) -> io::Result<()> {
    fs::write(path, value)
}
