//! # Draft Store
//!
//! Drafts are kept normalized: a map from id to draft for lookup, plus a
//! separate `order` list that fixes the display order (newest first). Both are
//! updated together by every operation in this module, so they never disagree.
//!
//! At most one draft is *active*: the one the edit form targets.
//!
//! Mutations on an id that does not exist are silent no-ops. A stale caller
//! (an autosave timer that fires after a delete, say) must not be able to
//! crash the store or bring a removed draft back.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::model::{DraftUpdate, SavingStatus, ServiceDraft};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftStore {
    by_id: HashMap<Uuid, ServiceDraft>,
    order: Vec<Uuid>,
    active_draft_id: Option<Uuid>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty draft at the front of the list and makes it active.
    pub fn create_draft(&mut self) -> &ServiceDraft {
        let draft = ServiceDraft::new();
        let id = draft.id;
        self.order.insert(0, id);
        self.active_draft_id = Some(id);
        tracing::debug!(draft = %id, "draft created");
        self.by_id.entry(id).or_insert(draft)
    }

    /// Points the active draft at `id`.
    ///
    /// Unknown ids are refused: the pointer stays where it was and `false` is
    /// returned.
    pub fn select_draft(&mut self, id: Uuid) -> bool {
        if !self.by_id.contains_key(&id) {
            return false;
        }
        self.active_draft_id = Some(id);
        true
    }

    /// Writes one field and flags the draft as `saving`.
    ///
    /// Returns `false` if no such draft exists.
    pub fn update_field(&mut self, id: Uuid, update: DraftUpdate) -> bool {
        let Some(draft) = self.by_id.get_mut(&id) else {
            return false;
        };
        tracing::debug!(draft = %id, field = %update.field(), "draft field updated");
        draft.apply(update);
        draft.saving_status = SavingStatus::Saving;
        draft.updated_at = Utc::now();
        true
    }

    /// Flags the draft as `saved`. Leaves `updated_at` alone.
    pub fn mark_saved(&mut self, id: Uuid) -> bool {
        match self.by_id.get_mut(&id) {
            Some(draft) => {
                draft.saving_status = SavingStatus::Saved;
                true
            }
            None => false,
        }
    }

    /// Removes a draft. If it was active, the first remaining draft becomes
    /// active (or none, when the store is empty).
    pub fn delete_draft(&mut self, id: Uuid) -> Option<ServiceDraft> {
        let removed = self.by_id.remove(&id);
        self.order.retain(|x| *x != id);
        if self.active_draft_id == Some(id) {
            self.active_draft_id = self.order.first().copied();
        }
        removed
    }

    pub fn clear_all_drafts(&mut self) -> usize {
        let count = self.by_id.len();
        self.by_id.clear();
        self.order.clear();
        self.active_draft_id = None;
        count
    }

    pub fn get(&self, id: &Uuid) -> Option<&ServiceDraft> {
        self.by_id.get(id)
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active_draft_id
    }

    pub fn active(&self) -> Option<&ServiceDraft> {
        self.active_draft_id.and_then(|id| self.by_id.get(&id))
    }

    /// Drafts in display order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDraft> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.order
    }

    /// 0-based display position of a draft.
    pub fn position(&self, id: &Uuid) -> Option<usize> {
        self.order.iter().position(|x| x == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Repairs a store loaded from disk: drops ordering entries without a
    /// record, appends records missing from the ordering, and clears a
    /// dangling active pointer.
    pub fn normalize(&mut self) {
        let by_id = &self.by_id;
        self.order.retain(|id| by_id.contains_key(id));
        let mut orphans: Vec<&ServiceDraft> = self
            .by_id
            .values()
            .filter(|d| !self.order.contains(&d.id))
            .collect();
        orphans.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        let orphan_ids: Vec<Uuid> = orphans.into_iter().map(|d| d.id).collect();
        self.order.extend(orphan_ids);

        if let Some(active) = self.active_draft_id {
            if !self.by_id.contains_key(&active) {
                self.active_draft_id = self.order.first().copied();
            }
        }
    }
}
