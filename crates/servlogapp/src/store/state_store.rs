use super::backend::StorageBackend;
use super::{AppState, DataStore};
use crate::error::Result;

pub struct StateStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    root_key: String,
    state: AppState,
}

impl<B: StorageBackend> StateStore<B> {
    /// Loads the document stored under `root_key`, or starts empty.
    ///
    /// The draft collection is normalized on the way in, so an `order` list or
    /// active pointer that disagrees with `byId` is repaired before anything
    /// else sees it.
    pub fn load(backend: B, root_key: impl Into<String>) -> Result<Self> {
        let root_key = root_key.into();
        let state = match backend.load(&root_key)? {
            Some(raw) if !raw.trim().is_empty() => {
                let mut state: AppState = serde_json::from_str(&raw)?;
                state.drafts.normalize();
                tracing::debug!(
                    drafts = state.drafts.len(),
                    logs = state.logs.len(),
                    "state loaded"
                );
                state
            }
            _ => AppState::default(),
        };
        Ok(Self {
            backend,
            root_key,
            state,
        })
    }

    /// A store with no document yet, without reading the backend.
    pub fn empty(backend: B, root_key: impl Into<String>) -> Self {
        Self {
            backend,
            root_key: root_key.into(),
            state: AppState::default(),
        }
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn commit(&self, state: &AppState) -> Result<()> {
        let raw = serde_json::to_string_pretty(state)?;
        self.backend.save(&self.root_key, &raw)
    }
}

impl<B: StorageBackend> DataStore for StateStore<B> {
    fn state(&self) -> &AppState {
        &self.state
    }

    fn transact<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AppState) -> Result<T>,
    {
        let mut working = self.state.clone();
        let out = f(&mut working)?;
        if working != self.state {
            if let Err(e) = self.commit(&working) {
                tracing::warn!(error = %e, "write failed, changes rolled back");
                return Err(e);
            }
            self.state = working;
        }
        Ok(out)
    }

    fn location(&self) -> String {
        self.backend.location(&self.root_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServlogError;
    use crate::logs::tests::sample_log;
    use crate::model::DraftUpdate;
    use crate::store::mem_backend::MemBackend;

    fn store() -> StateStore<MemBackend> {
        StateStore::load(MemBackend::new(), "root").unwrap()
    }

    #[test]
    fn missing_document_starts_empty() {
        let s = store();
        assert!(s.state().drafts.is_empty());
        assert!(s.state().logs.is_empty());
    }

    #[test]
    fn document_shape() {
        let mut s = store();
        let id = s.transact(|st| Ok(st.drafts.create_draft().id)).unwrap();
        s.transact(|st| {
            st.logs.add_log(sample_log("A", "2024-01-01"));
            Ok(())
        })
        .unwrap();

        let raw = s.backend.load("root").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["drafts"]["byId"][id.to_string()].is_object());
        assert_eq!(value["drafts"]["order"][0], id.to_string());
        assert_eq!(value["drafts"]["activeDraftId"], id.to_string());
        assert_eq!(value["logs"]["items"][0]["carId"], "A");
        assert!(value.get("filters").is_none());
    }

    #[test]
    fn reload_round_trips_state() {
        let mut s = store();
        let id = s.transact(|st| Ok(st.drafts.create_draft().id)).unwrap();
        s.transact(|st| {
            st.drafts.update_field(id, DraftUpdate::CarId("CAR-1".into()));
            Ok(())
        })
        .unwrap();

        let reloaded = StateStore::load(s.backend, "root").unwrap();
        assert_eq!(reloaded.state().drafts.get(&id).unwrap().car_id, "CAR-1");
        assert_eq!(reloaded.state().drafts.active_id(), Some(id));
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut s = store();
        s.transact(|st| Ok(st.drafts.create_draft().id)).unwrap();
        let before = s.state().clone();

        s.backend.set_simulate_write_error(true);
        let err = s.transact(|st| {
            st.drafts.create_draft();
            Ok(())
        });
        assert!(matches!(err, Err(ServlogError::Store(_))));
        assert_eq!(s.state(), &before);
        assert_eq!(s.state().drafts.len(), 1);
    }

    #[test]
    fn closure_error_discards_changes() {
        let mut s = store();
        let err: Result<()> = s.transact(|st| {
            st.drafts.create_draft();
            Err(ServlogError::NoActiveDraft)
        });
        assert!(err.is_err());
        assert!(s.state().drafts.is_empty());
        assert_eq!(s.backend.write_count(), 0);
    }

    #[test]
    fn unchanged_state_is_not_written() {
        let mut s = store();
        s.transact(|st| {
            st.drafts.mark_saved(uuid::Uuid::new_v4());
            Ok(())
        })
        .unwrap();
        assert_eq!(s.backend.write_count(), 0);
    }

    #[test]
    fn load_normalizes_drafts() {
        let backend = MemBackend::new();
        let ghost = uuid::Uuid::new_v4();
        backend.insert_raw(
            "root",
            &format!(
                r#"{{"drafts":{{"byId":{{}},"order":["{ghost}"],"activeDraftId":"{ghost}"}},"logs":{{"items":[]}}}}"#
            ),
        );
        let s = StateStore::load(backend, "root").unwrap();
        assert!(s.state().drafts.ids().is_empty());
        assert_eq!(s.state().drafts.active_id(), None);
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let backend = MemBackend::new();
        backend.insert_raw("root", "{not json");
        assert!(matches!(
            StateStore::load(backend, "root"),
            Err(ServlogError::Serialization(_))
        ));
    }
}
