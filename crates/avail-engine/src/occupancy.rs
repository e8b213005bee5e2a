//! Occupancy accumulation — consumed capacity from existing bookings.
//!
//! Only `pending` and `confirmed` appointments consume capacity. Counting is
//! interval overlap over half-open ranges: `[a, b)` and `[c, d)` overlap iff
//! `a < d && c < b`, so an appointment ending exactly when a slot starts does
//! not collide with it.

use chrono::{DateTime, Utc};

use crate::types::Appointment;

/// Consumed-capacity view over a set of appointments. Built once per query
/// from an immutable snapshot; answering is read-only.
#[derive(Debug, Clone)]
pub struct Occupancy {
    /// Capacity-consuming intervals, sorted by start.
    intervals: Vec<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Occupancy {
    /// Build from an appointment snapshot, keeping only statuses that consume
    /// capacity and discarding empty intervals.
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        let mut intervals: Vec<(DateTime<Utc>, DateTime<Utc>)> = appointments
            .iter()
            .filter(|a| a.status.consumes_capacity())
            .filter(|a| a.start_datetime < a.end_datetime)
            .map(|a| (a.start_datetime, a.end_datetime))
            .collect();
        intervals.sort_unstable();
        Occupancy { intervals }
    }

    /// How many appointments are active at `instant`.
    pub fn consumed_at(&self, instant: DateTime<Utc>) -> u32 {
        self.intervals
            .iter()
            .filter(|(start, end)| *start <= instant && instant < *end)
            .count() as u32
    }

    /// Worst-case concurrency over the half-open span `[start, end)`.
    ///
    /// The active count is a step function that only rises at appointment
    /// starts, so evaluating at the span start and at every appointment start
    /// inside the span covers all maxima.
    pub fn max_consumed_in(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
        if start >= end {
            return 0;
        }
        let mut max = self.consumed_at(start);
        for (appt_start, _) in &self.intervals {
            if start < *appt_start && *appt_start < end {
                max = max.max(self.consumed_at(*appt_start));
            }
        }
        max
    }

    /// Number of capacity-consuming intervals loaded.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
