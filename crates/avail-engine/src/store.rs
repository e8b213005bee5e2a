//! In-process booking store over a JSON snapshot.
//!
//! `MemoryStore` implements [`BookingStore`] against an immutable, fully
//! deserialized [`Snapshot`]. The CLI and the integration tests run on it;
//! it also pins down the reference fetch semantics (service filtering,
//! overlap window) that a database-backed store must reproduce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::BookingStore;
use crate::error::{AvailabilityError, Result};
use crate::types::{Appointment, DropEvent, ScheduleRule, Service, Storefront};

/// A complete, mutually consistent export of one or more storefronts' booking
/// data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub storefronts: Vec<Storefront>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub rules: Vec<ScheduleRule>,
    #[serde(default)]
    pub drops: Vec<DropEvent>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl Snapshot {
    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    /// `AvailabilityError::DataSource` when the document does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AvailabilityError::DataSource(format!("snapshot parse: {e}")))
    }

    /// Run write-time validation over every service, rule and drop in the
    /// snapshot.
    pub fn validate(&self) -> Result<()> {
        for service in &self.services {
            service.validate()?;
        }
        for rule in &self.rules {
            rule.validate()?;
        }
        for drop in &self.drops {
            drop.validate()?;
        }
        Ok(())
    }
}

/// [`BookingStore`] over an in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Snapshot,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        MemoryStore { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

fn applies(record_service: Option<&String>, service_id: &str) -> bool {
    record_service.map_or(true, |s| s == service_id)
}

impl BookingStore for MemoryStore {
    fn active_rules(&self, storefront_id: &str, service_id: &str) -> Result<Vec<ScheduleRule>> {
        Ok(self
            .snapshot
            .rules
            .iter()
            .filter(|r| r.storefront_id == storefront_id)
            .filter(|r| r.is_active)
            .filter(|r| applies(r.service_id.as_ref(), service_id))
            .cloned()
            .collect())
    }

    fn active_drops(&self, storefront_id: &str, service_id: &str) -> Result<Vec<DropEvent>> {
        Ok(self
            .snapshot
            .drops
            .iter()
            .filter(|d| d.storefront_id == storefront_id)
            .filter(|d| d.is_active)
            .filter(|d| applies(d.service_id.as_ref(), service_id))
            .cloned()
            .collect())
    }

    fn overlapping_appointments(
        &self,
        storefront_id: &str,
        service_id: &str,
        utc_start: DateTime<Utc>,
        utc_end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        Ok(self
            .snapshot
            .appointments
            .iter()
            .filter(|a| a.storefront_id == storefront_id && a.service_id == service_id)
            .filter(|a| a.start_datetime < utc_end && utc_start < a.end_datetime)
            .cloned()
            .collect())
    }

    fn service(&self, service_id: &str) -> Result<Option<Service>> {
        Ok(self
            .snapshot
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned())
    }

    fn storefront(&self, storefront_id: &str) -> Result<Option<Storefront>> {
        Ok(self
            .snapshot
            .storefronts
            .iter()
            .find(|s| s.id == storefront_id)
            .cloned())
    }
}
