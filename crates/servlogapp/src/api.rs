//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every servlog operation, whichever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs**: selectors become ids, `field value` text becomes a
//!   typed [`DraftUpdate`]
//! - **Owns view state**: the [`FilterState`] and its memoized [`FilteredView`]
//! - **Drives autosave**: every draft edit is reported to the [`Autosave`]
//!   table, deletes cancel pending saves, and the host loop settles due saves
//!   through [`ServlogApi::run_autosave`]
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: returns [`CmdResult`]s, not strings
//! - **Waiting**: it never sleeps. Callers pass the current `Instant`.
//!
//! ## Generic Over DataStore
//!
//! `ServlogApi<S: DataStore>` is generic over the storage backend:
//! - Production: `ServlogApi<FileStore>`
//! - Testing: `ServlogApi<InMemoryStore>`

use crate::autosave::{self, Autosave};
use crate::commands::{self, CmdResult};
use crate::error::{Result, ServlogError};
use crate::filters::{FilterState, FilteredView, TypeFilter};
use crate::index::{resolve_draft, resolve_log, Selector};
use crate::model::{DraftField, DraftUpdate};
use crate::store::{AppState, DataStore};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub struct ServlogApi<S: DataStore> {
    store: S,
    filters: FilterState,
    view: FilteredView,
    autosave: Autosave,
}

impl<S: DataStore> ServlogApi<S> {
    pub fn new(store: S, autosave_delay: Duration) -> Self {
        Self {
            store,
            filters: FilterState::new(),
            view: FilteredView::new(),
            autosave: Autosave::new(autosave_delay),
        }
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    // --- Drafts ---

    pub fn create_draft(&mut self) -> Result<CmdResult> {
        commands::drafts::create(&mut self.store)
    }

    pub fn list_drafts(&self) -> CmdResult {
        commands::drafts::list(&self.store)
    }

    pub fn show_draft(&self, selector: Option<&str>) -> Result<CmdResult> {
        let id = self.draft_id(selector)?;
        commands::drafts::show(&self.store, id)
    }

    pub fn select_draft(&mut self, selector: &str) -> Result<CmdResult> {
        let id = self.draft_id(Some(selector))?;
        commands::drafts::select(&mut self.store, id)
    }

    /// Parses `value` for `field` and writes it to the selected (or active)
    /// draft.
    pub fn set_draft_field(
        &mut self,
        selector: Option<&str>,
        field: &str,
        value: &str,
    ) -> Result<CmdResult> {
        let field: DraftField = field.parse()?;
        let update = DraftUpdate::parse(field, value)?;
        let id = self.draft_id(selector)?;
        self.update_draft(id, update)
    }

    pub fn update_draft(&mut self, id: Uuid, update: DraftUpdate) -> Result<CmdResult> {
        let result = commands::drafts::update_field(&mut self.store, id, update)?;
        if let Some(draft) = self.store.state().drafts.get(&id) {
            self.autosave.observe(draft, Instant::now());
        }
        Ok(result)
    }

    pub fn check_draft(&self, selector: Option<&str>) -> Result<CmdResult> {
        let id = self.draft_id(selector)?;
        commands::drafts::check(&self.store, id)
    }

    pub fn delete_draft(&mut self, selector: Option<&str>) -> Result<CmdResult> {
        let id = self.draft_id(selector)?;
        self.delete_draft_by_id(id)
    }

    /// Deleting an id twice is a no-op the second time.
    pub fn delete_draft_by_id(&mut self, id: Uuid) -> Result<CmdResult> {
        let result = commands::drafts::delete(&mut self.store, id)?;
        self.autosave.cancel(&id);
        Ok(result)
    }

    pub fn clear_drafts(&mut self) -> Result<CmdResult> {
        let result = commands::drafts::clear(&mut self.store)?;
        self.autosave.cancel_all();
        Ok(result)
    }

    /// Promotes the active draft. Failures come back as notices.
    pub fn promote(&mut self) -> CmdResult {
        commands::promote::run(&mut self.store)
    }

    // --- Logs ---

    pub fn list_logs(&mut self) -> CmdResult {
        commands::logs::list(&self.store, &self.filters, &mut self.view)
    }

    pub fn show_log(&self, selector: &str) -> Result<CmdResult> {
        let id = self.log_id(selector)?;
        commands::logs::show(&self.store, id)
    }

    /// Edits a log from `field=value` assignments.
    pub fn edit_log<I: AsRef<str>>(&mut self, selector: &str, assignments: &[I]) -> Result<CmdResult> {
        if assignments.is_empty() {
            return Err(ServlogError::Api(
                "Nothing to change: pass at least one FIELD=VALUE".to_string(),
            ));
        }
        let id = self.log_id(selector)?;
        let updates = assignments
            .iter()
            .map(|a| DraftUpdate::parse_assignment(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        commands::logs::edit(&mut self.store, id, updates)
    }

    pub fn delete_log(&mut self, selector: &str) -> Result<CmdResult> {
        let id = self.log_id(selector)?;
        commands::logs::delete(&mut self.store, id)
    }

    // --- Filters ---

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.set_search(search);
    }

    pub fn set_type_filter(&mut self, filter: TypeFilter) {
        self.filters.set_type(filter);
    }

    pub fn set_start_from(&mut self, from: Option<String>) {
        self.filters.set_start_from(from);
    }

    pub fn set_start_to(&mut self, to: Option<String>) {
        self.filters.set_start_to(to);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    // --- Autosave ---

    pub fn next_autosave_deadline(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    pub fn pending_autosaves(&self) -> usize {
        self.autosave.pending_count()
    }

    /// Settles every draft whose quiet period ended by `now`.
    ///
    /// If the settle cannot be written, the drafts go back on the table for
    /// another quiet period and the error is returned.
    pub fn run_autosave(&mut self, now: Instant) -> Result<Vec<Uuid>> {
        let due = self.autosave.due(now);
        self.settle(due, now)
    }

    /// Settles every pending draft at once.
    pub fn flush_autosave(&mut self) -> Result<Vec<Uuid>> {
        let all = self.autosave.drain();
        self.settle(all, Instant::now())
    }

    /// Picks up drafts a previous process left `saving`, then settles those
    /// that are already due.
    pub fn resume_autosave(&mut self, now_utc: DateTime<Utc>, now: Instant) -> Result<Vec<Uuid>> {
        self.autosave.resume(&self.store.state().drafts, now_utc, now);
        self.run_autosave(now)
    }

    fn settle(&mut self, ids: Vec<Uuid>, now: Instant) -> Result<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(ids);
        }
        match self
            .store
            .transact(|s| Ok(autosave::settle(&mut s.drafts, &ids)))
        {
            Ok(saved) => Ok(saved),
            Err(e) => {
                self.autosave.retry(&ids, now);
                Err(e)
            }
        }
    }

    // --- Selectors ---

    /// The selected draft, or the active one when no selector is given.
    fn draft_id(&self, selector: Option<&str>) -> Result<Uuid> {
        let drafts = &self.store.state().drafts;
        match selector {
            Some(raw) => resolve_draft(drafts, &raw.parse::<Selector>()?),
            None => drafts.active_id().ok_or(ServlogError::NoActiveDraft),
        }
    }

    fn log_id(&self, selector: &str) -> Result<Uuid> {
        resolve_log(&self.store.state().logs, &selector.parse::<Selector>()?)
    }
}
