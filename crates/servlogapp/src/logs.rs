//! # Log Store
//!
//! Finalized service logs, newest first. Logs are replaced wholesale on edit
//! and never point back at the draft they came from.
//!
//! Each mutation stamps the store with a fresh [`revision`], which the
//! filtered view uses to know when its cached result went stale.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::model::ServiceLog;

static REVISIONS: AtomicU64 = AtomicU64::new(1);

/// A process-wide, never reused revision number.
pub(crate) fn next_revision() -> u64 {
    REVISIONS.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogStore {
    items: Vec<ServiceLog>,
    #[serde(skip, default = "next_revision")]
    revision: u64,
}

impl Default for LogStore {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            revision: next_revision(),
        }
    }
}

impl PartialEq for LogStore {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts at the front. The caller guarantees the log is complete.
    pub fn add_log(&mut self, log: ServiceLog) {
        tracing::debug!(log = %log.id, "service log added");
        self.items.insert(0, log);
        self.revision = next_revision();
    }

    /// Replaces the log with the same id. Returns `false` if there is none.
    pub fn update_log(&mut self, log: ServiceLog) -> bool {
        match self.items.iter_mut().find(|l| l.id == log.id) {
            Some(slot) => {
                *slot = log;
                self.revision = next_revision();
                true
            }
            None => false,
        }
    }

    pub fn delete_log(&mut self, id: Uuid) -> Option<ServiceLog> {
        let idx = self.items.iter().position(|l| l.id == id)?;
        self.revision = next_revision();
        Some(self.items.remove(idx))
    }

    pub fn get(&self, id: &Uuid) -> Option<&ServiceLog> {
        self.items.iter().find(|l| l.id == *id)
    }

    pub fn items(&self) -> &[ServiceLog] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceLog> {
        self.items.iter()
    }

    /// 0-based display position of a log.
    pub fn position(&self, id: &Uuid) -> Option<usize> {
        self.items.iter().position(|l| l.id == *id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::ServiceType;
    use chrono::Utc;

    pub(crate) fn sample_log(car: &str, start: &str) -> ServiceLog {
        ServiceLog {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            provider_id: "ACME".into(),
            service_order: "SO-1".into(),
            car_id: car.into(),
            odometer: 1000.0,
            engine_hours: 10.0,
            start_date: start.into(),
            end_date: crate::dates::plus_one_day_iso(start).unwrap_or_default(),
            service_type: ServiceType::Planned,
            service_description: String::new(),
        }
    }

    #[test]
    fn add_puts_newest_first() {
        let mut store = LogStore::new();
        let a = sample_log("A", "2024-01-01");
        let b = sample_log("B", "2024-01-02");
        store.add_log(a.clone());
        store.add_log(b.clone());
        assert_eq!(store.items()[0].id, b.id);
        assert_eq!(store.items()[1].id, a.id);
        assert_eq!(store.position(&a.id), Some(1));
    }

    #[test]
    fn update_replaces_by_id() {
        let mut store = LogStore::new();
        let mut log = sample_log("A", "2024-01-01");
        store.add_log(log.clone());
        log.car_id = "A2".into();
        assert!(store.update_log(log.clone()));
        assert_eq!(store.get(&log.id).unwrap().car_id, "A2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_unknown_is_noop() {
        let mut store = LogStore::new();
        store.add_log(sample_log("A", "2024-01-01"));
        let revision = store.revision();
        assert!(!store.update_log(sample_log("B", "2024-01-02")));
        assert_eq!(store.revision(), revision);
        assert_eq!(store.items()[0].car_id, "A");
    }

    #[test]
    fn delete_unknown_is_noop() {
        let mut store = LogStore::new();
        let log = sample_log("A", "2024-01-01");
        store.add_log(log.clone());
        assert!(store.delete_log(log.id).is_some());
        assert!(store.delete_log(log.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn every_mutation_bumps_revision() {
        let mut store = LogStore::new();
        let r0 = store.revision();
        let log = sample_log("A", "2024-01-01");
        store.add_log(log.clone());
        let r1 = store.revision();
        assert!(r1 > r0);
        store.update_log(log.clone());
        let r2 = store.revision();
        assert!(r2 > r1);
        store.delete_log(log.id);
        assert!(store.revision() > r2);
    }

    #[test]
    fn serializes_items_only() {
        let mut store = LogStore::new();
        store.add_log(sample_log("A", "2024-01-01"));
        let json = serde_json::to_value(&store).unwrap();
        assert_eq!(json["items"][0]["carId"], "A");
        assert!(json.get("revision").is_none());
    }
}
