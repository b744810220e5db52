//! # Domain Model: Drafts and Service Logs
//!
//! Servlog has two record shapes:
//!
//! - [`ServiceDraft`]: a record being filled in. Every domain field may still be
//!   empty, and it carries a [`SavingStatus`] for the autosave indicator.
//! - [`ServiceLog`]: a finalized record. The numeric fields and the service type
//!   are no longer optional; a log can only be built from a draft that passed
//!   validation (see [`ServiceLog::from_draft`]).
//!
//! ## The Derived End Date
//!
//! A service always spans exactly one day: `end_date == start_date + 1 day`.
//! The end date is never written directly. [`DraftUpdate`] has no end-date
//! variant, and [`ServiceDraft::apply`] recomputes it whenever the start date
//! changes. If the new start date is empty or not a calendar date, the end date
//! is cleared and validation reports both fields.
//!
//! ## Field Names
//!
//! [`DraftField`] names every field that validation can complain about. On the
//! wire and in error maps it uses the camelCase names (`providerId`,
//! `engineHours`, ...). The CLI also accepts kebab/snake case and a few short
//! aliases (`odo`, `hours`, `start`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::dates::{plus_one_day_iso, today_iso};
use crate::error::{Result, ServlogError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Planned,
    Unplanned,
    Emergency,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::Planned,
        ServiceType::Unplanned,
        ServiceType::Emergency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Planned => "planned",
            ServiceType::Unplanned => "unplanned",
            ServiceType::Emergency => "emergency",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ServlogError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ServlogError::InvalidValue {
                field: DraftField::Type.to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SavingStatus {
    Idle,
    Saving,
    #[default]
    Saved,
}

/// Every field of a draft that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    ProviderId,
    ServiceOrder,
    CarId,
    Odometer,
    EngineHours,
    StartDate,
    EndDate,
    Type,
    ServiceDescription,
}

impl DraftField {
    pub const ALL: [DraftField; 9] = [
        DraftField::ProviderId,
        DraftField::ServiceOrder,
        DraftField::CarId,
        DraftField::Odometer,
        DraftField::EngineHours,
        DraftField::StartDate,
        DraftField::EndDate,
        DraftField::Type,
        DraftField::ServiceDescription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::ProviderId => "providerId",
            DraftField::ServiceOrder => "serviceOrder",
            DraftField::CarId => "carId",
            DraftField::Odometer => "odometer",
            DraftField::EngineHours => "engineHours",
            DraftField::StartDate => "startDate",
            DraftField::EndDate => "endDate",
            DraftField::Type => "type",
            DraftField::ServiceDescription => "serviceDescription",
        }
    }

    /// Human label, as shown next to form inputs.
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::ProviderId => "Provider ID",
            DraftField::ServiceOrder => "Service Order",
            DraftField::CarId => "Car ID",
            DraftField::Odometer => "Odometer (mi)",
            DraftField::EngineHours => "Engine Hours",
            DraftField::StartDate => "Start Date",
            DraftField::EndDate => "End Date",
            DraftField::Type => "Type",
            DraftField::ServiceDescription => "Service Description",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = ServlogError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        let field = match key.as_str() {
            "providerid" | "provider" => DraftField::ProviderId,
            "serviceorder" | "order" => DraftField::ServiceOrder,
            "carid" | "car" => DraftField::CarId,
            "odometer" | "odo" => DraftField::Odometer,
            "enginehours" | "hours" => DraftField::EngineHours,
            "startdate" | "start" => DraftField::StartDate,
            "enddate" | "end" => DraftField::EndDate,
            "type" | "servicetype" => DraftField::Type,
            "servicedescription" | "description" | "desc" => DraftField::ServiceDescription,
            _ => return Err(ServlogError::InvalidField(s.to_string())),
        };
        Ok(field)
    }
}

/// A single typed field write.
///
/// There is deliberately no end-date variant: the end date only ever follows
/// the start date.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    ProviderId(String),
    ServiceOrder(String),
    CarId(String),
    Odometer(Option<f64>),
    EngineHours(Option<f64>),
    StartDate(String),
    Type(Option<ServiceType>),
    ServiceDescription(String),
}

impl DraftUpdate {
    /// Builds an update from raw text input.
    ///
    /// Numbers: empty input clears the value, unparsable input is kept as NaN so
    /// validation reports "Number required" instead of silently dropping it.
    /// Type: empty input clears the value, anything else must be a known type.
    pub fn parse(field: DraftField, raw: &str) -> Result<Self> {
        let update = match field {
            DraftField::ProviderId => DraftUpdate::ProviderId(raw.to_string()),
            DraftField::ServiceOrder => DraftUpdate::ServiceOrder(raw.to_string()),
            DraftField::CarId => DraftUpdate::CarId(raw.to_string()),
            DraftField::Odometer => DraftUpdate::Odometer(parse_number(raw)),
            DraftField::EngineHours => DraftUpdate::EngineHours(parse_number(raw)),
            DraftField::StartDate => DraftUpdate::StartDate(raw.trim().to_string()),
            DraftField::EndDate => {
                return Err(ServlogError::ReadOnlyField(field.to_string()));
            }
            DraftField::Type => {
                if raw.trim().is_empty() {
                    DraftUpdate::Type(None)
                } else {
                    DraftUpdate::Type(Some(raw.parse()?))
                }
            }
            DraftField::ServiceDescription => DraftUpdate::ServiceDescription(raw.to_string()),
        };
        Ok(update)
    }

    /// Parses `field=value` as used by `servlog log edit`.
    pub fn parse_assignment(input: &str) -> Result<Self> {
        let (key, value) = input
            .split_once('=')
            .ok_or_else(|| ServlogError::Api(format!("Expected FIELD=VALUE, got: {}", input)))?;
        let field: DraftField = key.parse()?;
        Self::parse(field, value)
    }

    pub fn field(&self) -> DraftField {
        match self {
            DraftUpdate::ProviderId(_) => DraftField::ProviderId,
            DraftUpdate::ServiceOrder(_) => DraftField::ServiceOrder,
            DraftUpdate::CarId(_) => DraftField::CarId,
            DraftUpdate::Odometer(_) => DraftField::Odometer,
            DraftUpdate::EngineHours(_) => DraftField::EngineHours,
            DraftUpdate::StartDate(_) => DraftField::StartDate,
            DraftUpdate::Type(_) => DraftField::Type,
            DraftUpdate::ServiceDescription(_) => DraftField::ServiceDescription,
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.parse::<f64>().unwrap_or(f64::NAN))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDraft {
    pub id: Uuid,
    pub provider_id: String,
    pub service_order: String,
    pub car_id: String,
    pub odometer: Option<f64>,
    pub engine_hours: Option<f64>,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub service_description: String,
    #[serde(default)]
    pub saving_status: SavingStatus,
    pub updated_at: DateTime<Utc>,
}

impl Default for ServiceDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceDraft {
    /// An empty draft starting today and ending tomorrow.
    pub fn new() -> Self {
        let start = today_iso();
        let end = plus_one_day_iso(&start).unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            provider_id: String::new(),
            service_order: String::new(),
            car_id: String::new(),
            odometer: None,
            engine_hours: None,
            start_date: start,
            end_date: end,
            service_type: None,
            service_description: String::new(),
            saving_status: SavingStatus::Saved,
            updated_at: Utc::now(),
        }
    }

    /// Writes one field, keeping the end date in step with the start date.
    ///
    /// Only touches domain fields; saving status and timestamps are the
    /// caller's business.
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::ProviderId(v) => self.provider_id = v,
            DraftUpdate::ServiceOrder(v) => self.service_order = v,
            DraftUpdate::CarId(v) => self.car_id = v,
            DraftUpdate::Odometer(v) => self.odometer = v,
            DraftUpdate::EngineHours(v) => self.engine_hours = v,
            DraftUpdate::StartDate(v) => {
                self.end_date = plus_one_day_iso(&v).unwrap_or_default();
                self.start_date = v;
            }
            DraftUpdate::Type(v) => self.service_type = v,
            DraftUpdate::ServiceDescription(v) => self.service_description = v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLog {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub provider_id: String,
    pub service_order: String,
    pub car_id: String,
    pub odometer: f64,
    pub engine_hours: f64,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub service_description: String,
}

impl ServiceLog {
    /// Copies a draft into a log with the given identity.
    ///
    /// Callers validate first; this only refuses drafts whose required
    /// optional fields are still empty.
    pub fn from_draft(draft: &ServiceDraft, id: Uuid, created_at: DateTime<Utc>) -> Result<Self> {
        let odometer = draft
            .odometer
            .ok_or_else(|| ServlogError::Incomplete(DraftField::Odometer.to_string()))?;
        let engine_hours = draft
            .engine_hours
            .ok_or_else(|| ServlogError::Incomplete(DraftField::EngineHours.to_string()))?;
        let service_type = draft
            .service_type
            .ok_or_else(|| ServlogError::Incomplete(DraftField::Type.to_string()))?;

        Ok(Self {
            id,
            created_at,
            provider_id: draft.provider_id.clone(),
            service_order: draft.service_order.clone(),
            car_id: draft.car_id.clone(),
            odometer,
            engine_hours,
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            service_type,
            service_description: draft.service_description.clone(),
        })
    }

    /// A brand new log (fresh id, created now) from a validated draft.
    pub fn promote(draft: &ServiceDraft) -> Result<Self> {
        Self::from_draft(draft, Uuid::new_v4(), Utc::now())
    }

    /// A draft-shaped copy of this log, used to edit and validate it with the
    /// same rules as drafts.
    pub fn to_draft(&self) -> ServiceDraft {
        ServiceDraft {
            id: self.id,
            provider_id: self.provider_id.clone(),
            service_order: self.service_order.clone(),
            car_id: self.car_id.clone(),
            odometer: Some(self.odometer),
            engine_hours: Some(self.engine_hours),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            service_type: Some(self.service_type),
            service_description: self.service_description.clone(),
            saving_status: SavingStatus::Saved,
            updated_at: self.created_at,
        }
    }
}
