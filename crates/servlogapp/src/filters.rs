//! # Filtering the Log List
//!
//! [`FilterState`] holds the list-view parameters (search text, service type,
//! start-date bounds). It is view state only and is never persisted.
//!
//! [`filtered_logs`] is the pure selector. A log passes when all of these hold:
//!
//! - **Text**: the trimmed search text is empty, or is a case-insensitive
//!   substring of the provider, service order, car or description.
//! - **Type**: the filter is `all`, or equals the log's type.
//! - **Dates**: `start_date >= start_from` and `start_date <= start_to` for each
//!   bound that is set, compared as ISO strings.
//!
//! Results keep the store order (newest first).
//!
//! [`FilteredView`] memoizes the selector. It keeps only positions into the log
//! store, keyed on the revisions of both inputs, and recomputes as soon as
//! either one changed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ServlogError};
use crate::logs::{next_revision, LogStore};
use crate::model::{ServiceLog, ServiceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    #[serde(untagged)]
    Only(ServiceType),
}

impl TypeFilter {
    pub fn matches(&self, t: ServiceType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == t,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(t) => t.fmt(f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ServlogError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            Ok(TypeFilter::Only(s.parse()?))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    search: String,
    #[serde(rename = "type")]
    service_type: TypeFilter,
    start_from: Option<String>,
    start_to: Option<String>,
    #[serde(skip)]
    revision: u64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            service_type: TypeFilter::All,
            start_from: None,
            start_to: None,
            revision: next_revision(),
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.revision = next_revision();
    }

    pub fn set_type(&mut self, service_type: TypeFilter) {
        self.service_type = service_type;
        self.revision = next_revision();
    }

    /// Empty strings clear the bound.
    pub fn set_start_from(&mut self, from: Option<String>) {
        self.start_from = from.filter(|s| !s.is_empty());
        self.revision = next_revision();
    }

    pub fn set_start_to(&mut self, to: Option<String>) {
        self.start_to = to.filter(|s| !s.is_empty());
        self.revision = next_revision();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn service_type(&self) -> TypeFilter {
        self.service_type
    }

    pub fn start_from(&self) -> Option<&str> {
        self.start_from.as_deref()
    }

    pub fn start_to(&self) -> Option<&str> {
        self.start_to.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_default(&self) -> bool {
        self.search.trim().is_empty()
            && self.service_type == TypeFilter::All
            && self.start_from.is_none()
            && self.start_to.is_none()
    }

    pub fn matches(&self, log: &ServiceLog) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [
                &log.provider_id,
                &log.service_order,
                &log.car_id,
                &log.service_description,
            ]
            .iter()
            .any(|v| v.to_lowercase().contains(&needle));

        let matches_type = self.service_type.matches(log.service_type);

        let start = log.start_date.as_str();
        let start_ok = self.start_from.as_deref().map_or(true, |from| start >= from)
            && self.start_to.as_deref().map_or(true, |to| start <= to);

        matches_search && matches_type && start_ok
    }
}

/// The filtered list, in store order.
pub fn filtered_logs<'a>(logs: &'a [ServiceLog], filters: &FilterState) -> Vec<&'a ServiceLog> {
    logs.iter().filter(|l| filters.matches(l)).collect()
}

#[derive(Debug, Default)]
pub struct FilteredView {
    key: Option<(u64, u64)>,
    positions: Vec<usize>,
}

impl FilteredView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions (into `logs`) of the logs that pass `filters`.
    pub fn positions(&mut self, logs: &LogStore, filters: &FilterState) -> &[usize] {
        let key = (logs.revision(), filters.revision());
        if self.key != Some(key) {
            tracing::trace!(logs = logs.len(), "recomputing filtered view");
            self.positions = logs
                .iter()
                .enumerate()
                .filter(|(_, l)| filters.matches(l))
                .map(|(i, _)| i)
                .collect();
            self.key = Some(key);
        }
        &self.positions
    }

    pub fn logs<'a>(&mut self, logs: &'a LogStore, filters: &FilterState) -> Vec<&'a ServiceLog> {
        let items = logs.items();
        self.positions(logs, filters)
            .iter()
            .filter_map(|i| items.get(*i))
            .collect()
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
