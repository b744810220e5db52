//! # Configuration
//!
//! Servlog configuration is loaded with [`confique`] from, in priority order:
//!
//! 1. **Environment variables**: `SERVLOG_AUTOSAVE_DELAY_MS`, `SERVLOG_ROOT_KEY`,
//!    `SERVLOG_DATA`.
//! 2. **Config file**: `servlog.toml` in the OS config directory (via the
//!    `directories` crate), or the file named by `SERVLOG_CONFIG`. A missing
//!    file is fine.
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `autosave_delay_ms` | `500` | Quiet period before an edited draft is marked saved |
//! | `root_key` | `root` | Storage key of the document (file `<root_key>.json`) |
//! | `data_dir` | OS data dir | Where the document lives |
//!
//! ## CLI Usage
//!
//! - `servlog config` shows the effective values and where they came from.

use crate::error::{Result, ServlogError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "servlog.toml";

/// Configuration for servlog, stored in `servlog.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServlogConfig {
    /// Milliseconds a draft must stay untouched before it is marked saved.
    #[config(env = "SERVLOG_AUTOSAVE_DELAY_MS", default = 500)]
    pub autosave_delay_ms: u64,

    /// Storage key of the persisted document.
    #[config(env = "SERVLOG_ROOT_KEY", default = "root")]
    pub root_key: String,

    /// Directory holding the document. Defaults to the OS data directory.
    #[config(env = "SERVLOG_DATA")]
    pub data_dir: Option<PathBuf>,
}

impl Default for ServlogConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 500,
            root_key: "root".to_string(),
            data_dir: None,
        }
    }
}

impl ServlogConfig {
    /// Loads environment, then `file`, then defaults.
    pub fn load_from(file: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(file)
            .load()
            .map_err(|e| ServlogError::Config(e.to_string()))
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// The configured data directory, or the OS default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
        }
    }
}

/// `SERVLOG_CONFIG`, or `servlog.toml` in the OS config directory.
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("SERVLOG_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "servlog", "servlog")
        .ok_or_else(|| ServlogError::Config("Could not determine home directory".to_string()))
}
