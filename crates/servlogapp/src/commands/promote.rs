//! Promotion: the one-way copy of the active draft into the log collection.
//!
//! The draft must validate cleanly. A rejected promotion leaves both stores as
//! they were. A promotion that fails after validation (a write error, say) is
//! rolled back by the store and reported as a notice rather than an `Err`, so
//! callers always get a [`CmdResult`] to show. The draft itself is never
//! modified or removed by promotion.

use crate::commands::{CmdMessage, CmdResult, COMPLETE_REQUIRED_FIELDS};
use crate::error::Result;
use crate::index::DisplayLog;
use crate::model::ServiceLog;
use crate::store::DataStore;
use crate::validation::validate_draft;

pub fn run<S: DataStore>(store: &mut S) -> CmdResult {
    let mut result = CmdResult::default();

    let Some(draft) = store.state().drafts.active().cloned() else {
        result.add_message(
            CmdMessage::error("Cannot create service log").with_description(COMPLETE_REQUIRED_FIELDS),
        );
        return result;
    };

    let errors = validate_draft(&draft);
    if !errors.is_empty() {
        tracing::debug!(draft = %draft.id, errors = errors.len(), "promotion blocked");
        result.validation = errors;
        result.add_message(
            CmdMessage::error("Cannot create service log").with_description(COMPLETE_REQUIRED_FIELDS),
        );
        return result;
    }

    let added: Result<ServiceLog> = store.transact(|s| {
        let log = ServiceLog::promote(&draft)?;
        s.logs.add_log(log.clone());
        Ok(log)
    });

    match added {
        Ok(log) => {
            tracing::info!(draft = %draft.id, log = %log.id, "draft promoted");
            result.affected_logs.push(DisplayLog { index: 1, log });
            result.add_message(CmdMessage::success("Service log created"));
        }
        Err(e) => {
            tracing::error!(draft = %draft.id, error = %e, "promotion failed");
            result.add_message(
                CmdMessage::error("Failed to add service log").with_description(e.to_string()),
            );
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::{DraftField, DraftUpdate};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use crate::validation::NUMBER_REQUIRED;

    #[test]
    fn complete_draft_becomes_log() {
        let mut store = StoreFixture::new().with_complete_draft("CAR-1").build();
        let draft = store.state().drafts.active().cloned().unwrap();

        let result = run(&mut store);
        assert!(!result.has_errors());
        assert_eq!(result.messages[0].title, "Service log created");

        let logs = &store.state().logs;
        assert_eq!(logs.len(), 1);
        let log = &logs.items()[0];
        assert_ne!(log.id, draft.id);
        assert_eq!(log.car_id, "CAR-1");
        assert_eq!(log.start_date, draft.start_date);
        assert_eq!(log.end_date, draft.end_date);
        assert_eq!(Some(log.odometer), draft.odometer);
        assert_eq!(result.affected_logs[0].log.id, log.id);

        // The draft stays where it was.
        assert_eq!(store.state().drafts.get(&draft.id), Some(&draft));
    }

    #[test]
    fn missing_odometer_blocks_promotion() {
        let mut store = StoreFixture::new().with_complete_draft("CAR-1").build();
        let id = store.state().drafts.active_id().unwrap();
        store
            .transact(|s| {
                s.drafts.update_field(id, DraftUpdate::Odometer(None));
                Ok(())
            })
            .unwrap();

        let result = run(&mut store);
        assert_eq!(
            result.validation.get(&DraftField::Odometer).map(String::as_str),
            Some(NUMBER_REQUIRED)
        );
        let msg = &result.messages[0];
        assert_eq!(msg.level, MessageLevel::Error);
        assert_eq!(msg.title, "Cannot create service log");
        assert_eq!(msg.description.as_deref(), Some(COMPLETE_REQUIRED_FIELDS));
        assert!(store.state().logs.is_empty());
    }

    #[test]
    fn no_active_draft_is_a_notice() {
        let mut store = InMemoryStore::new();
        let result = run(&mut store);
        assert_eq!(result.messages[0].title, "Cannot create service log");
        assert!(store.state().logs.is_empty());
    }

    #[test]
    fn write_failure_rolls_back_and_reports() {
        let mut store = StoreFixture::new().with_complete_draft("CAR-1").build();
        store.fail_writes(true);

        let result = run(&mut store);
        let msg = &result.messages[0];
        assert_eq!(msg.level, MessageLevel::Error);
        assert_eq!(msg.title, "Failed to add service log");
        assert!(msg.description.as_deref().unwrap().contains("Simulated write error"));
        assert!(store.state().logs.is_empty());
    }

    #[test]
    fn newest_log_comes_first() {
        let mut store = StoreFixture::new().with_complete_draft("FIRST").build();
        run(&mut store);
        let mut store = StoreFixture { store }.with_complete_draft("SECOND").build();
        run(&mut store);
        let cars: Vec<&str> = store
            .state()
            .logs
            .iter()
            .map(|l| l.car_id.as_str())
            .collect();
        assert_eq!(cars, vec!["SECOND", "FIRST"]);
    }
}
