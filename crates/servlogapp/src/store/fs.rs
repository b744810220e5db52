use super::fs_backend::FsBackend;
use super::state_store::StateStore;
use crate::error::Result;
use std::path::PathBuf;

/// Production store: the document is a JSON file in the data directory.
pub type FileStore = StateStore<FsBackend>;

impl FileStore {
    pub fn open(data_dir: PathBuf, root_key: &str) -> Result<Self> {
        StateStore::load(FsBackend::new(data_dir), root_key)
    }
}
