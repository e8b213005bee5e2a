//! Domain model for the availability engine.
//!
//! The persisted records (`ScheduleRule`, `DropEvent`, `Appointment`,
//! `Service`, `Storefront`) are read-only inputs fetched from the CRUD layer.
//! `TimeBlock` and `AvailableSlot` are derived, never stored. All wall-clock
//! fields (`start_time`, `specific_date`, ...) are civil values interpreted in
//! the storefront's timezone; only `Appointment` carries UTC instants.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// Default priority for daily (date-specific) rules.
pub const PRIORITY_DAILY: i32 = 10;
/// Default priority for monthly rules.
pub const PRIORITY_MONTHLY: i32 = 5;
/// Default priority for weekly recurring rules.
pub const PRIORITY_WEEKLY: i32 = 2;
/// Priority assigned to published drops. Sits above every rule kind so a
/// drop always governs the window it covers.
pub const PRIORITY_DROP: i32 = 100;

/// Minutes in a civil day. Resolved blocks cover `[0, 1440)`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Discriminated anchor for a schedule rule. Each variant carries exactly the
/// fields its kind requires, so a weekly rule without a weekday (or a daily
/// rule with one) is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleKind {
    /// Recurs every week on `day_of_week` (0 = Sunday ... 6 = Saturday).
    Weekly { day_of_week: u8 },
    /// Applies to exactly one civil date.
    Daily { specific_date: NaiveDate },
    /// Recurs every day of `month` (1-12); `year` absent means every year.
    Monthly {
        month: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
    },
}

impl RuleKind {
    /// Default priority convention for this rule kind: daily=10, monthly=5,
    /// weekly=2. Callers may override per rule.
    pub fn default_priority(&self) -> i32 {
        match self {
            RuleKind::Daily { .. } => PRIORITY_DAILY,
            RuleKind::Monthly { .. } => PRIORITY_MONTHLY,
            RuleKind::Weekly { .. } => PRIORITY_WEEKLY,
        }
    }
}

/// A recurring or override availability window authored by the storefront owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub id: String,
    pub storefront_id: String,
    /// `None` means the rule applies to every service of the storefront.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// `false` marks a blackout window, not a booking opportunity.
    pub is_available: bool,
    pub max_concurrent_appointments: u32,
    pub priority: i32,
    pub is_active: bool,
}

impl ScheduleRule {
    /// Check the construction invariants: `start_time < end_time` (no
    /// overnight wraparound), positive capacity, and anchor fields in range.
    pub fn validate(&self) -> Result<()> {
        if self.start_time >= self.end_time {
            return Err(AvailabilityError::InvalidRule(format!(
                "rule {}: start_time must precede end_time",
                self.id
            )));
        }
        if self.max_concurrent_appointments == 0 {
            return Err(AvailabilityError::InvalidRule(format!(
                "rule {}: max_concurrent_appointments must be positive",
                self.id
            )));
        }
        match self.kind {
            RuleKind::Weekly { day_of_week } if day_of_week > 6 => {
                Err(AvailabilityError::InvalidRule(format!(
                    "rule {}: day_of_week {} out of range 0-6",
                    self.id, day_of_week
                )))
            }
            RuleKind::Monthly { month, .. } if !(1..=12).contains(&month) => {
                Err(AvailabilityError::InvalidRule(format!(
                    "rule {}: month {} out of range 1-12",
                    self.id, month
                )))
            }
            _ => Ok(()),
        }
    }
}

/// A curated, explicitly published one-off booking window. Semantically a
/// date-anchored rule, but with its own identity and an `is_published` gate:
/// unpublished drops are invisible to slot computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEvent {
    pub id: String,
    pub storefront_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    pub drop_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub max_concurrent_appointments: u32,
    pub is_published: bool,
    pub is_active: bool,
}

impl DropEvent {
    pub fn validate(&self) -> Result<()> {
        if self.start_time >= self.end_time {
            return Err(AvailabilityError::InvalidRule(format!(
                "drop {}: start_time must precede end_time",
                self.id
            )));
        }
        if self.max_concurrent_appointments == 0 {
            return Err(AvailabilityError::InvalidRule(format!(
                "drop {}: max_concurrent_appointments must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

/// Lifecycle state of an appointment. Only `Pending` and `Confirmed` consume
/// capacity; terminal and negative states do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
    Declined,
}

impl AppointmentStatus {
    pub fn consumes_capacity(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

/// An existing booking. Read-only input; `start`/`end` are UTC instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub storefront_id: String,
    pub service_id: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// The bookable service whose slots are being computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub storefront_id: String,
    pub name: String,
    /// Length of one booking. Must be positive.
    pub duration_minutes: u32,
    /// Dead time appended after a booking before the same capacity slot can
    /// be reused. Zero means back-to-back bookings.
    #[serde(default)]
    pub buffer_time_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Service {
    /// Check the construction invariant: a service must have a positive
    /// duration. A zero-duration service is invalid input, not a service
    /// with no availability.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(AvailabilityError::InvalidRule(format!(
                "service {}: duration_minutes must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

/// The storefront owning the rules. `timezone` is an IANA zone name; every
/// civil field on rules and drops is interpreted in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storefront {
    pub id: String,
    pub name: String,
    pub timezone: String,
}

/// One resolved sub-interval of a civil day, tagged open or closed. Start and
/// end are minutes from midnight (`end` may be 1440, which `NaiveTime` cannot
/// express). Derived by the day resolver; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBlock {
    #[serde(serialize_with = "ser_minutes")]
    pub start_minute: u16,
    #[serde(serialize_with = "ser_minutes")]
    pub end_minute: u16,
    pub is_available: bool,
    pub max_concurrent: u32,
    pub priority: i32,
    /// Id of the rule or drop that governs this block; empty when no rule
    /// covers it.
    pub source_id: String,
}

impl TimeBlock {
    /// Civil duration of the block in minutes.
    pub fn len_minutes(&self) -> u16 {
        self.end_minute - self.start_minute
    }
}

/// A bookable candidate emitted by the slot generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub local_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub local_start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub local_end_time: NaiveTime,
    /// Remaining concurrent capacity; always >= 1 on an emitted slot.
    pub available_capacity: u32,
}

/// Service fields echoed on the response for the booking UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub name: String,
    pub duration_minutes: u32,
    pub buffer_time_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl From<&Service> for ServiceSummary {
    fn from(s: &Service) -> Self {
        ServiceSummary {
            name: s.name.clone(),
            duration_minutes: s.duration_minutes,
            buffer_time_minutes: s.buffer_time_minutes,
            price: s.price,
        }
    }
}

/// The full output surface consumed by the booking write path and the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub storefront_id: String,
    pub service_id: String,
    pub timezone: String,
    pub service: ServiceSummary,
    /// Chronological across the whole requested range. Empty means genuinely
    /// no availability; failures surface as errors, never as empty lists.
    pub slots: Vec<AvailableSlot>,
}

/// Convert a civil time-of-day to minutes from midnight, truncating seconds.
pub fn minutes_of(t: NaiveTime) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// Format minutes-from-midnight as `HH:MM`. Accepts 1440 ("24:00") so block
/// ends can be rendered.
pub fn format_minutes(m: u16) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}

fn ser_minutes<S: serde::Serializer>(m: &u16, ser: S) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_str(&format_minutes(*m))
}

/// Serde adapter for `HH:MM` civil times (the wire format for rule and slot
/// times). Accepts `HH:MM:SS` on input for tolerance.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&t.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
