//! # Draft Validation
//!
//! [`validate_draft`] maps a draft to the set of fields that are currently
//! invalid. An empty map means the draft can be promoted.
//!
//! Validation never fails and never mutates: problems are data. The caller
//! decides what to block (promotion and log edits) and what not to (typing and
//! autosave are never blocked).
//!
//! ## Rules
//!
//! | Field | Message |
//! |-------|---------|
//! | `providerId`, `serviceOrder`, `carId` | `Required` when blank after trimming |
//! | `odometer`, `engineHours` | `Number required` unless a finite number |
//! | `startDate`, `endDate` | `Required`, then `Invalid date`, then `Date must be on or after 1970-01-01` |
//! | `endDate` (cross-field) | `Must be {start + 1 day}` when both dates are otherwise valid |
//! | `type` | `Required` when not chosen |
//! | `serviceDescription` | never validated |
//!
//! Fields are checked independently. Only the end-date rule looks at another
//! field, and only once both dates passed their own checks.

use std::collections::BTreeMap;

use crate::dates::{is_before_min, is_iso_date, plus_one_day_iso, MIN_ISO_DATE};
use crate::model::{DraftField, ServiceDraft, ServiceLog};

pub type DraftErrors = BTreeMap<DraftField, String>;

pub const REQUIRED: &str = "Required";
pub const NUMBER_REQUIRED: &str = "Number required";
pub const INVALID_DATE: &str = "Invalid date";

pub fn validate_draft(d: &ServiceDraft) -> DraftErrors {
    let mut e = DraftErrors::new();

    for (field, value) in [
        (DraftField::ProviderId, &d.provider_id),
        (DraftField::ServiceOrder, &d.service_order),
        (DraftField::CarId, &d.car_id),
    ] {
        if value.trim().is_empty() {
            e.insert(field, REQUIRED.to_string());
        }
    }

    for (field, value) in [
        (DraftField::Odometer, d.odometer),
        (DraftField::EngineHours, d.engine_hours),
    ] {
        if !value.is_some_and(f64::is_finite) {
            e.insert(field, NUMBER_REQUIRED.to_string());
        }
    }

    if let Some(msg) = date_error(&d.start_date) {
        e.insert(DraftField::StartDate, msg);
    }
    if let Some(msg) = date_error(&d.end_date) {
        e.insert(DraftField::EndDate, msg);
    }

    if !e.contains_key(&DraftField::StartDate) && !e.contains_key(&DraftField::EndDate) {
        match plus_one_day_iso(&d.start_date) {
            Some(must) if d.end_date != must => {
                e.insert(DraftField::EndDate, format!("Must be {}", must));
            }
            Some(_) => {}
            // Shape was fine but the day does not exist (2023-02-30).
            None => {
                e.insert(DraftField::StartDate, INVALID_DATE.to_string());
            }
        }
    }

    if d.service_type.is_none() {
        e.insert(DraftField::Type, REQUIRED.to_string());
    }

    e
}

/// Validates an existing log with the draft rules.
pub fn validate_log(log: &ServiceLog) -> DraftErrors {
    validate_draft(&log.to_draft())
}

fn date_error(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(REQUIRED.to_string())
    } else if !is_iso_date(value) {
        Some(INVALID_DATE.to_string())
    } else if is_before_min(value) {
        Some(format!("Date must be on or after {}", MIN_ISO_DATE))
    } else {
        None
    }
}
