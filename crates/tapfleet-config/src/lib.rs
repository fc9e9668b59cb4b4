//! Configuration for the tapfleet tools.
//!
//! A TOML file at the platform config path, overlaid by `TAPFLEET_*`
//! environment variables, decides where the device store lives and the
//! default output settings. Front ends layer their own flags on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tapfleet_core::{DEFAULT_SLOT_KEY, FileSlot};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Where the device collection is persisted.
    #[serde(default)]
    pub store: StoreSettings,

    /// Output defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreSettings {
    /// Directory holding the slot file. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Slot key; the file is `<path>/<key>.json`.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: None,
            key: default_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_key() -> String {
    DEFAULT_SLOT_KEY.into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Reject values no front end can use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.store.key.trim();
        if key.is_empty() || key.contains(['/', '\\']) {
            return Err(ConfigError::Validation {
                field: "store.key".into(),
                reason: format!("'{}' is not a usable file name", self.store.key),
            });
        }
        Ok(())
    }

    /// Directory the store lives in, after applying defaults.
    pub fn store_dir(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(data_dir)
    }

    /// The storage slot this config points at.
    pub fn file_slot(&self) -> FileSlot {
        FileSlot::new(self.store_dir(), &self.store.key)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "tapfleet", "tapfleet")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default directory for the device store.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(under_home: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(under_home);
    p.push("tapfleet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file is not an
/// error; defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TAPFLEET_").split("_"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
