//! # Storage Layer
//!
//! All servlog data lives in a single JSON document, [`AppState`], stored under
//! one root key:
//!
//! ```text
//! {
//!   "drafts": { "byId": { ... }, "order": [ ... ], "activeDraftId": "..." },
//!   "logs":   { "items": [ ... ] }
//! }
//! ```
//!
//! Filter parameters are view state and are not part of the document.
//!
//! ## Transactions
//!
//! Every mutation goes through [`DataStore::transact`]. The closure runs against
//! a working copy of the state. The copy replaces the live state only after it
//! has been written to the backend, so a failed write (or a closure that
//! returns `Err`) leaves both memory and disk exactly as they were. A closure
//! that changes nothing does not write at all.
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: raw key-value I/O (filesystem or memory).
//! - [`state_store::StateStore`]: the document, its loading and rollback.
//! - [`fs::FileStore`]: production store over [`fs_backend::FsBackend`].
//! - [`memory::InMemoryStore`]: store over [`mem_backend::MemBackend`] for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! └── root.json      # the whole document (file name follows the root key)
//! ```

use crate::drafts::DraftStore;
use crate::error::Result;
use crate::logs::LogStore;
use serde::{Deserialize, Serialize};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod state_store;

pub use state_store::StateStore;

pub const DEFAULT_ROOT_KEY: &str = "root";

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub drafts: DraftStore,
    #[serde(default)]
    pub logs: LogStore,
}

/// Abstract interface for servlog state storage.
pub trait DataStore {
    /// Read-only view of the current state.
    fn state(&self) -> &AppState;

    /// Runs `f` against a working copy and persists the result.
    ///
    /// On `Err` from `f` or from the write, the state is unchanged.
    fn transact<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AppState) -> Result<T>;

    /// Where the document lives, for display.
    fn location(&self) -> String;
}
