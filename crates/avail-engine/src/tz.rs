//! Timezone translation — civil wall-clock in the storefront's IANA zone
//! to UTC instants and back, deterministic across DST transitions.
//!
//! Resolution policy (both directions are invariants of the engine):
//! - Spring-forward gap: a civil time that does not exist maps to the first
//!   valid instant at or after the gap.
//! - Fall-back overlap: a civil time that occurs twice resolves to the first
//!   occurrence (the earlier instant, pre-transition offset).

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};

/// DST gaps are probed forward in 15-minute steps; real-world gaps are 30 or
/// 60 minutes, so 8 steps (2 hours) is a generous bound.
const GAP_PROBE_STEP_MINUTES: i64 = 15;
const GAP_PROBE_MAX_STEPS: u32 = 8;

/// Bidirectional civil/UTC converter for one IANA zone.
#[derive(Debug, Clone, Copy)]
pub struct TzMapper {
    tz: Tz,
}

impl TzMapper {
    /// Parse an IANA zone name.
    ///
    /// # Errors
    /// `AvailabilityError::InvalidTimezone` when the name is unknown. This is
    /// a fatal configuration error for the storefront, never retried.
    pub fn new(zone: &str) -> Result<Self> {
        let tz: Tz = zone
            .parse()
            .map_err(|_| AvailabilityError::InvalidTimezone(zone.to_string()))?;
        Ok(TzMapper { tz })
    }

    /// Convert a civil date plus minutes-from-midnight to a UTC instant.
    ///
    /// `minute` may be up to 1440 inclusive; values past midnight roll into
    /// the next civil day, which is how block ends at 24:00 convert.
    pub fn civil_to_utc(&self, date: NaiveDate, minute: u16) -> Result<DateTime<Utc>> {
        let naive = date
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::minutes(i64::from(minute)))
            .ok_or_else(|| {
                AvailabilityError::InvalidTimezone(format!("datetime overflow at {date}"))
            })?;

        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            // Fall-back overlap: first occurrence.
            LocalResult::Ambiguous(first, _second) => Ok(first.with_timezone(&Utc)),
            // Spring-forward gap: probe forward to the first valid instant.
            LocalResult::None => {
                for step in 1..=GAP_PROBE_MAX_STEPS {
                    let probed = naive + Duration::minutes(GAP_PROBE_STEP_MINUTES * i64::from(step));
                    match self.tz.from_local_datetime(&probed) {
                        LocalResult::Single(dt) => return Ok(dt.with_timezone(&Utc)),
                        LocalResult::Ambiguous(first, _) => return Ok(first.with_timezone(&Utc)),
                        LocalResult::None => continue,
                    }
                }
                Err(AvailabilityError::InvalidTimezone(format!(
                    "no valid instant near {naive} in {}",
                    self.tz
                )))
            }
        }
    }

    /// Convert a UTC instant back to the zone's civil date and time-of-day.
    pub fn utc_to_civil(&self, instant: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
        let local = instant.with_timezone(&self.tz);
        (local.date_naive(), local.time())
    }

    /// The zone's IANA name.
    pub fn zone_name(&self) -> &'static str {
        self.tz.name()
    }
}
