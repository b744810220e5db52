use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ServlogError};
use crate::index::{display_draft, index_drafts};
use crate::model::DraftUpdate;
use crate::store::DataStore;
use crate::validation::validate_draft;
use uuid::Uuid;

pub fn create<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let id = store.transact(|s| Ok(s.drafts.create_draft().id))?;
    let affected = display_draft(&store.state().drafts, &id)
        .into_iter()
        .collect();
    Ok(CmdResult::default()
        .with_affected_drafts(affected)
        .with_message(CmdMessage::success("Draft created")))
}

pub fn list<S: DataStore>(store: &S) -> CmdResult {
    CmdResult::default().with_listed_drafts(index_drafts(&store.state().drafts))
}

/// One draft with its current validation errors.
pub fn show<S: DataStore>(store: &S, id: Uuid) -> Result<CmdResult> {
    let drafts = &store.state().drafts;
    let shown = display_draft(drafts, &id).ok_or(ServlogError::DraftNotFound(id))?;
    let errors = validate_draft(&shown.draft);
    Ok(CmdResult::default()
        .with_listed_drafts(vec![shown])
        .with_validation(errors))
}

pub fn select<S: DataStore>(store: &mut S, id: Uuid) -> Result<CmdResult> {
    store.transact(|s| {
        if s.drafts.select_draft(id) {
            Ok(())
        } else {
            Err(ServlogError::DraftNotFound(id))
        }
    })?;
    let affected = display_draft(&store.state().drafts, &id)
        .into_iter()
        .collect();
    Ok(CmdResult::default().with_affected_drafts(affected))
}

/// Writes one field. The draft is left `saving`; the autosave controller
/// settles it later.
pub fn update_field<S: DataStore>(store: &mut S, id: Uuid, update: DraftUpdate) -> Result<CmdResult> {
    store.transact(|s| {
        if s.drafts.update_field(id, update) {
            Ok(())
        } else {
            Err(ServlogError::DraftNotFound(id))
        }
    })?;
    let shown = display_draft(&store.state().drafts, &id).ok_or(ServlogError::DraftNotFound(id))?;
    let errors = validate_draft(&shown.draft);
    Ok(CmdResult::default()
        .with_affected_drafts(vec![shown])
        .with_validation(errors))
}

/// Validation errors for a draft, without touching it.
pub fn check<S: DataStore>(store: &S, id: Uuid) -> Result<CmdResult> {
    let draft = store
        .state()
        .drafts
        .get(&id)
        .ok_or(ServlogError::DraftNotFound(id))?;
    let errors = validate_draft(draft);
    let mut result = CmdResult::default().with_validation(errors);
    if result.validation.is_empty() {
        result.add_message(CmdMessage::success("Draft is complete"));
    }
    Ok(result)
}

/// Deleting an id that is already gone changes nothing and is not an error.
pub fn delete<S: DataStore>(store: &mut S, id: Uuid) -> Result<CmdResult> {
    let removed = store.transact(|s| Ok(s.drafts.delete_draft(id)))?;
    let mut result = CmdResult::default();
    if removed.is_some() {
        tracing::info!(draft = %id, "draft deleted");
        result.add_message(CmdMessage::success("Draft deleted"));
    }
    Ok(result)
}

pub fn clear<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    let count = store.transact(|s| Ok(s.drafts.clear_all_drafts()))?;
    tracing::info!(count, "drafts cleared");
    Ok(CmdResult::default().with_message(CmdMessage::info("All drafts cleared")))
}
