use super::mem_backend::MemBackend;
use super::state_store::StateStore;
use super::DEFAULT_ROOT_KEY;

pub type InMemoryStore = StateStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        StateStore::empty(MemBackend::new(), DEFAULT_ROOT_KEY)
    }

    /// Makes every following write fail, to exercise rollback paths.
    pub fn fail_writes(&self, fail: bool) {
        self.backend.set_simulate_write_error(fail);
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{DraftUpdate, ServiceType};
    use crate::store::DataStore;
    use uuid::Uuid;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Adds `count` empty drafts. The last one created is active.
        pub fn with_drafts(mut self, count: usize) -> Self {
            for _ in 0..count {
                self.store
                    .transact(|s| Ok(s.drafts.create_draft().id))
                    .unwrap();
            }
            self
        }

        /// Adds a draft that passes validation and makes it active.
        pub fn with_complete_draft(mut self, car: &str) -> Self {
            let id: Uuid = self
                .store
                .transact(|s| Ok(s.drafts.create_draft().id))
                .unwrap();
            let updates = [
                DraftUpdate::ProviderId("ACME".into()),
                DraftUpdate::ServiceOrder("SO-1".into()),
                DraftUpdate::CarId(car.into()),
                DraftUpdate::Odometer(Some(1200.0)),
                DraftUpdate::EngineHours(Some(42.0)),
                DraftUpdate::StartDate("2024-01-15".into()),
                DraftUpdate::Type(Some(ServiceType::Planned)),
            ];
            self.store
                .transact(|s| {
                    for update in updates {
                        s.drafts.update_field(id, update);
                    }
                    Ok(())
                })
                .unwrap();
            self
        }

        pub fn build(self) -> InMemoryStore {
            self.store
        }
    }
}
