//! # Autosave
//!
//! Editing a draft flips it to `saving`. Once the draft has been quiet for the
//! autosave delay (500 ms by default), the controller re-runs validation and
//! flips it to `saved`. Another edit before the delay elapses pushes the
//! deadline back, so a burst of keystrokes produces a single save.
//!
//! ## Scheduling
//!
//! [`Autosave`] is a deadline table keyed by draft id. It owns no timer and no
//! thread: the host loop asks for [`Autosave::next_deadline`], sleeps until
//! then (or until the next input), and calls [`Autosave::fire`]. Because every
//! draft has its own entry, editing one draft never delays or cancels another
//! draft's save.
//!
//! ## Removed Drafts
//!
//! A pending save for a draft that has since been deleted is dropped when it
//! fires: `mark_saved` on a missing id does nothing, so a late timer cannot
//! bring the draft back.
//!
//! ## Validation Hook
//!
//! Validation runs on every settle but does not block it; an invalid draft is
//! still marked `saved`. The error count is only logged.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::drafts::DraftStore;
use crate::model::{SavingStatus, ServiceDraft};
use crate::validation::validate_draft;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Autosave {
    delay: Duration,
    pending: HashMap<Uuid, Instant>,
}

impl Default for Autosave {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Autosave {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Reacts to a draft change. Only drafts that are `saving` get a deadline;
    /// an existing deadline for the same draft is replaced.
    pub fn observe(&mut self, draft: &ServiceDraft, now: Instant) {
        if draft.saving_status == SavingStatus::Saving {
            self.pending.insert(draft.id, now + self.delay);
        }
    }

    pub fn cancel(&mut self, id: &Uuid) -> bool {
        self.pending.remove(id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: &Uuid) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().min().copied()
    }

    /// Removes and returns every draft whose quiet period is over.
    pub fn due(&mut self, now: Instant) -> Vec<Uuid> {
        let mut due: Vec<(Uuid, Instant)> = self
            .pending
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*id, *deadline))
            .collect();
        due.sort_by_key(|(_, deadline)| *deadline);
        for (id, _) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(id, _)| id).collect()
    }

    /// Removes and returns every pending draft, earliest deadline first.
    pub fn drain(&mut self) -> Vec<Uuid> {
        let mut all: Vec<(Uuid, Instant)> = self.pending.drain().collect();
        all.sort_by_key(|(_, deadline)| *deadline);
        all.into_iter().map(|(id, _)| id).collect()
    }

    /// Puts ids back on the table with a fresh quiet period, for saves that
    /// could not be written.
    pub fn retry(&mut self, ids: &[Uuid], now: Instant) {
        for id in ids {
            self.pending.entry(*id).or_insert(now + self.delay);
        }
    }

    /// Settles every due draft. Returns the ids that were marked saved.
    pub fn fire(&mut self, drafts: &mut DraftStore, now: Instant) -> Vec<Uuid> {
        let due = self.due(now);
        settle(drafts, &due)
    }

    /// Settles every pending draft right away.
    pub fn flush(&mut self, drafts: &mut DraftStore) -> Vec<Uuid> {
        let all = self.drain();
        settle(drafts, &all)
    }

    /// Re-schedules drafts that were still `saving` when the previous process
    /// stopped. The quiet period counts from each draft's `updated_at`, so a
    /// draft edited long ago is due immediately.
    pub fn resume(&mut self, drafts: &DraftStore, now_utc: DateTime<Utc>, now: Instant) {
        for draft in drafts.iter() {
            if draft.saving_status != SavingStatus::Saving {
                continue;
            }
            let elapsed = now_utc
                .signed_duration_since(draft.updated_at)
                .to_std()
                .unwrap_or_default();
            let remaining = self.delay.saturating_sub(elapsed);
            self.pending.insert(draft.id, now + remaining);
        }
    }
}

/// Re-validates and marks the given drafts saved. Missing drafts are skipped.
pub fn settle(drafts: &mut DraftStore, ids: &[Uuid]) -> Vec<Uuid> {
    let mut saved = Vec::new();
    for &id in ids {
        let Some(draft) = drafts.get(&id) else {
            tracing::debug!(draft = %id, "autosave skipped, draft is gone");
            continue;
        };
        let errors = validate_draft(draft);
        if drafts.mark_saved(id) {
            tracing::debug!(draft = %id, errors = errors.len(), "draft autosaved");
            saved.push(id);
        }
    }
    saved
}
