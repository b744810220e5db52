//! # Command Layer
//!
//! This module contains the **core business logic** of servlog. Each group of
//! commands lives in its own submodule and implements plain functions over a
//! [`DataStore`](crate::store::DataStore).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Run every mutation through `DataStore::transact`, so a failed write leaves
//!   nothing half-applied
//! - Validate drafts and logs with [`crate::validation`]
//! - Return structured [`CmdResult`]s with affected records and notices
//! - Stay completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the store: no stdout, stderr or terminal concerns
//! - **Selector parsing**: the API resolves selectors to ids first
//! - **User interaction**: no prompts or confirmations. Destructive commands
//!   assume the caller already asked.
//! - **Timers**: autosave scheduling belongs to [`crate::autosave`]
//!
//! ## Notices
//!
//! User-facing outcomes are [`CmdMessage`]s with a level, a title and an
//! optional description, e.g. `error / "Cannot create service log" / "Please
//! complete all required fields."`. Field validation problems are not errors:
//! they travel in [`CmdResult::validation`].
//!
//! ## Command Modules
//!
//! - [`drafts`]: create, select, edit, check, delete and clear drafts
//! - [`promote`]: turn the active draft into a service log
//! - [`logs`]: list (filtered), show, edit and delete service logs

use crate::index::{DisplayDraft, DisplayLog};
use crate::validation::DraftErrors;
use serde::Serialize;

pub mod drafts;
pub mod logs;
pub mod promote;

pub const COMPLETE_REQUIRED_FIELDS: &str = "Please complete all required fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CmdMessage {
    fn new(level: MessageLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(MessageLevel::Info, title)
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(MessageLevel::Success, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(MessageLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(MessageLevel::Error, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmdResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected_drafts: Vec<DisplayDraft>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected_logs: Vec<DisplayLog>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listed_drafts: Vec<DisplayDraft>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listed_logs: Vec<DisplayLog>,
    #[serde(skip_serializing_if = "DraftErrors::is_empty")]
    pub validation: DraftErrors,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_affected_drafts(mut self, drafts: Vec<DisplayDraft>) -> Self {
        self.affected_drafts = drafts;
        self
    }

    pub fn with_affected_logs(mut self, logs: Vec<DisplayLog>) -> Self {
        self.affected_logs = logs;
        self
    }

    pub fn with_listed_drafts(mut self, drafts: Vec<DisplayDraft>) -> Self {
        self.listed_drafts = drafts;
        self
    }

    pub fn with_listed_logs(mut self, logs: Vec<DisplayLog>) -> Self {
        self.listed_logs = logs;
        self
    }

    pub fn with_validation(mut self, errors: DraftErrors) -> Self {
        self.validation = errors;
        self
    }

    /// True when any notice is at error level.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
