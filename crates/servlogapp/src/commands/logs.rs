use crate::commands::{CmdMessage, CmdResult, COMPLETE_REQUIRED_FIELDS};
use crate::error::{Result, ServlogError};
use crate::filters::{FilterState, FilteredView};
use crate::index::{display_log, DisplayLog};
use crate::model::{DraftUpdate, ServiceLog};
use crate::store::DataStore;
use crate::validation::validate_draft;
use uuid::Uuid;

/// Logs passing the filters, in store order, with their canonical indexes.
pub fn list<S: DataStore>(store: &S, filters: &FilterState, view: &mut FilteredView) -> CmdResult {
    let logs = &store.state().logs;
    let items = logs.items();
    let listed = view
        .positions(logs, filters)
        .iter()
        .filter_map(|&i| {
            items.get(i).map(|log| DisplayLog {
                index: i + 1,
                log: log.clone(),
            })
        })
        .collect();
    CmdResult::default().with_listed_logs(listed)
}

pub fn show<S: DataStore>(store: &S, id: Uuid) -> Result<CmdResult> {
    let shown = display_log(&store.state().logs, &id).ok_or(ServlogError::LogNotFound(id))?;
    Ok(CmdResult::default().with_listed_logs(vec![shown]))
}

/// Applies field updates to a log.
///
/// The log is edited as a draft-shaped copy, so a new start date re-derives
/// the end date and the draft rules decide what is acceptable. Nothing is
/// written unless the edited copy validates.
pub fn edit<S: DataStore>(store: &mut S, id: Uuid, updates: Vec<DraftUpdate>) -> Result<CmdResult> {
    let current = store
        .state()
        .logs
        .get(&id)
        .ok_or(ServlogError::LogNotFound(id))?;
    let mut working = current.to_draft();
    for update in updates {
        working.apply(update);
    }

    let errors = validate_draft(&working);
    if !errors.is_empty() {
        return Ok(CmdResult::default().with_validation(errors).with_message(
            CmdMessage::error("Validation failed").with_description(COMPLETE_REQUIRED_FIELDS),
        ));
    }

    let edited = ServiceLog::from_draft(&working, current.id, current.created_at)?;
    store.transact(|s| {
        if s.logs.update_log(edited) {
            Ok(())
        } else {
            Err(ServlogError::LogNotFound(id))
        }
    })?;
    tracing::info!(log = %id, "service log updated");

    let affected = display_log(&store.state().logs, &id).into_iter().collect();
    Ok(CmdResult::default()
        .with_affected_logs(affected)
        .with_message(CmdMessage::success("Service log updated")))
}

pub fn delete<S: DataStore>(store: &mut S, id: Uuid) -> Result<CmdResult> {
    let removed = store.transact(|s| Ok(s.logs.delete_log(id)))?;
    let mut result = CmdResult::default();
    if removed.is_some() {
        tracing::info!(log = %id, "service log deleted");
        result.add_message(CmdMessage::success("Service log deleted"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{promote, MessageLevel};
    use crate::filters::TypeFilter;
    use crate::model::{DraftField, ServiceType};
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn store_with_logs(cars: &[&str]) -> InMemoryStore {
        let mut fixture = StoreFixture::new();
        for car in cars {
            fixture = fixture.with_complete_draft(car);
            promote::run(&mut fixture.store);
        }
        fixture.build()
    }

    fn first_id(store: &InMemoryStore) -> Uuid {
        store.state().logs.items()[0].id
    }

    #[test]
    fn list_keeps_canonical_indexes_under_filters() {
        let store = store_with_logs(&["A", "B", "C"]);
        let mut filters = FilterState::new();
        filters.set_search("b");
        let mut view = FilteredView::new();

        let result = list(&store, &filters, &mut view);
        assert_eq!(result.listed_logs.len(), 1);
        assert_eq!(result.listed_logs[0].log.car_id, "B");
        assert_eq!(result.listed_logs[0].index, 2);
    }

    #[test]
    fn list_by_type() {
        let store = store_with_logs(&["A"]);
        let mut filters = FilterState::new();
        filters.set_type(TypeFilter::Only(ServiceType::Emergency));
        let mut view = FilteredView::new();
        assert!(list(&store, &filters, &mut view).listed_logs.is_empty());
        filters.set_type(TypeFilter::Only(ServiceType::Planned));
        assert_eq!(list(&store, &filters, &mut view).listed_logs.len(), 1);
    }

    #[test]
    fn edit_replaces_fields_and_keeps_identity() {
        let mut store = store_with_logs(&["A"]);
        let before = store.state().logs.items()[0].clone();

        let result = edit(
            &mut store,
            before.id,
            vec![
                DraftUpdate::CarId("A-2".into()),
                DraftUpdate::StartDate("2024-12-31".into()),
            ],
        )
        .unwrap();
        assert_eq!(result.messages[0].title, "Service log updated");

        let after = &store.state().logs.items()[0];
        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.car_id, "A-2");
        assert_eq!(after.end_date, "2025-01-01");
    }

    #[test]
    fn invalid_edit_is_rejected() {
        let mut store = store_with_logs(&["A"]);
        let id = first_id(&store);
        let before = store.state().clone();

        let result = edit(&mut store, id, vec![DraftUpdate::ProviderId("  ".into())]).unwrap();
        let msg = &result.messages[0];
        assert_eq!(msg.level, MessageLevel::Error);
        assert_eq!(msg.title, "Validation failed");
        assert!(result.validation.contains_key(&DraftField::ProviderId));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn clearing_a_number_is_rejected() {
        let mut store = store_with_logs(&["A"]);
        let id = first_id(&store);
        let result = edit(&mut store, id, vec![DraftUpdate::Odometer(None)]).unwrap();
        assert!(result.has_errors());
        assert_eq!(store.state().logs.items()[0].odometer, 1200.0);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = store_with_logs(&["A", "B"]);
        let id = first_id(&store);
        let first = delete(&mut store, id).unwrap();
        assert_eq!(first.messages[0].title, "Service log deleted");
        assert_eq!(store.state().logs.len(), 1);

        let second = delete(&mut store, id).unwrap();
        assert!(second.messages.is_empty());
        assert_eq!(store.state().logs.len(), 1);
    }

    #[test]
    fn show_unknown_log() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(show(&store, id), Err(ServlogError::LogNotFound(m)) if m == id));
    }
}
