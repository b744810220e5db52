//! # Startup
//!
//! [`initialize`] turns the environment into a ready [`ServlogApi`]:
//!
//! 1. Resolve the config file (`SERVLOG_CONFIG` or the OS config directory)
//!    and load [`ServlogConfig`].
//! 2. Pick the data directory: an explicit override (the CLI's `--data`), then
//!    `data_dir` from the config (which includes `SERVLOG_DATA`), then the OS
//!    data directory.
//! 3. Load the document stored under `root_key`.
//! 4. Resume autosave for drafts a previous run left `saving`, settling the
//!    ones whose quiet period already passed.

use crate::api::ServlogApi;
use crate::config::{config_file_path, ServlogConfig};
use crate::error::Result;
use crate::store::fs::FileStore;
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;

pub struct ServlogContext {
    pub api: ServlogApi<FileStore>,
    pub config: ServlogConfig,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

pub fn initialize(data_override: Option<PathBuf>) -> Result<ServlogContext> {
    let config_path = config_file_path()?;
    let config = ServlogConfig::load_from(&config_path)?;
    let data_dir = match data_override {
        Some(dir) => dir,
        None => config.data_dir()?,
    };
    tracing::debug!(
        data_dir = %data_dir.display(),
        config = %config_path.display(),
        "initializing"
    );

    let store = FileStore::open(data_dir.clone(), &config.root_key)?;
    let mut api = ServlogApi::new(store, config.autosave_delay());

    match api.resume_autosave(Utc::now(), Instant::now()) {
        Ok(saved) if !saved.is_empty() => {
            tracing::debug!(count = saved.len(), "settled drafts from a previous run");
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "could not settle drafts from a previous run"),
    }

    Ok(ServlogContext {
        api,
        config,
        config_path,
        data_dir,
    })
}
