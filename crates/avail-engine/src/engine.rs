//! Top-level availability computation.
//!
//! Composes the normalizer, resolver, occupancy accumulator and slot
//! generator day by day across the requested civil date range. The engine is
//! a pure function of its inputs: it holds no state between calls and reads
//! an immutable snapshot through [`BookingStore`]. Any collaborator failure
//! aborts the whole computation; partial slot lists are never returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{AvailabilityError, Result};
use crate::occupancy::Occupancy;
use crate::resolver::resolve_day;
use crate::rules::windows_for_day;
use crate::slots::generate_slots_for_day;
use crate::tz::TzMapper;
use crate::types::{
    Appointment, AvailabilityResponse, DropEvent, ScheduleRule, Service, ServiceSummary,
    Storefront,
};

/// Upper bound on the requested span, inclusive of both endpoints. Bounds the
/// computation at range length x rule count.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Read-only collaborator surface of the surrounding CRUD layer. The caller
/// is responsible for snapshot consistency: rules and appointments observed
/// through one store instance must be mutually consistent.
pub trait BookingStore {
    /// Active rules for the storefront that could apply to `service_id`
    /// (service-specific plus storefront-wide).
    fn active_rules(&self, storefront_id: &str, service_id: &str) -> Result<Vec<ScheduleRule>>;

    /// Active drops for the storefront that could apply to `service_id`.
    fn active_drops(&self, storefront_id: &str, service_id: &str) -> Result<Vec<DropEvent>>;

    /// Appointments whose `[start, end)` overlaps `[utc_start, utc_end)`,
    /// any status.
    fn overlapping_appointments(
        &self,
        storefront_id: &str,
        service_id: &str,
        utc_start: DateTime<Utc>,
        utc_end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    fn service(&self, service_id: &str) -> Result<Option<Service>>;

    fn storefront(&self, storefront_id: &str) -> Result<Option<Storefront>>;
}

/// Cooperative cancellation handle, checked at day boundaries. Cloning shares
/// the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag; the computation returns `Cancelled` at the next day
    /// boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A slot-computation request: which service at which storefront, over an
/// inclusive civil date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub storefront_id: String,
    pub service_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Compute the full availability response for `query` without cancellation.
pub fn compute_availability(
    store: &dyn BookingStore,
    query: &AvailabilityQuery,
) -> Result<AvailabilityResponse> {
    compute_availability_cancellable(store, query, &CancelFlag::new())
}

/// Compute the full availability response for `query`, honoring `cancel` at
/// each day boundary.
///
/// # Errors
/// - `InvalidRange` — inverted range or span over [`MAX_RANGE_DAYS`].
/// - `NotFound` — unknown storefront/service, or service of another storefront.
/// - `InvalidTimezone` — the storefront's zone name does not parse.
/// - `InvalidRule` — the service, or a fetched rule or drop, violates
///   construction invariants.
/// - `DataSource` — any collaborator fetch failed.
/// - `Cancelled` — `cancel` was raised mid-computation.
pub fn compute_availability_cancellable(
    store: &dyn BookingStore,
    query: &AvailabilityQuery,
    cancel: &CancelFlag,
) -> Result<AvailabilityResponse> {
    let span_days = validate_range(query.start_date, query.end_date)?;

    let storefront = store
        .storefront(&query.storefront_id)?
        .ok_or_else(|| AvailabilityError::NotFound(format!("storefront {}", query.storefront_id)))?;
    let service = store
        .service(&query.service_id)?
        .ok_or_else(|| AvailabilityError::NotFound(format!("service {}", query.service_id)))?;
    if service.storefront_id != storefront.id {
        return Err(AvailabilityError::NotFound(format!(
            "service {} does not belong to storefront {}",
            service.id, storefront.id
        )));
    }
    service.validate()?;

    let mapper = TzMapper::new(&storefront.timezone)?;

    let rules = store.active_rules(&storefront.id, &service.id)?;
    let drops = store.active_drops(&storefront.id, &service.id)?;
    for rule in &rules {
        rule.validate()?;
    }
    for drop in &drops {
        drop.validate()?;
    }

    // One occupancy fetch covering the whole range's UTC span. Local midnight
    // of the day after end_date closes the window.
    let window_start = mapper.civil_to_utc(query.start_date, 0)?;
    let day_after_end = query.end_date.succ_opt().ok_or_else(|| {
        AvailabilityError::InvalidRange(format!("end_date {} out of range", query.end_date))
    })?;
    let window_end = mapper.civil_to_utc(day_after_end, 0)?;
    let appointments =
        store.overlapping_appointments(&storefront.id, &service.id, window_start, window_end)?;
    let occupancy = Occupancy::from_appointments(&appointments);

    let mut slots = Vec::new();
    for day in query.start_date.iter_days().take(span_days as usize) {
        if cancel.is_cancelled() {
            return Err(AvailabilityError::Cancelled);
        }
        let windows = windows_for_day(&rules, &drops, &service.id, day);
        let blocks = resolve_day(&windows);
        slots.extend(generate_slots_for_day(
            &blocks, day, &service, &mapper, &occupancy,
        )?);
    }

    Ok(AvailabilityResponse {
        storefront_id: storefront.id,
        service_id: service.id.clone(),
        timezone: storefront.timezone,
        service: ServiceSummary::from(&service),
        slots,
    })
}

/// Validate the inclusive civil range and return its length in days.
fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<i64> {
    if end < start {
        return Err(AvailabilityError::InvalidRange(format!(
            "end_date {end} precedes start_date {start}"
        )));
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(AvailabilityError::InvalidRange(format!(
            "range of {days} days exceeds maximum of {MAX_RANGE_DAYS}"
        )));
    }
    Ok(days)
}
