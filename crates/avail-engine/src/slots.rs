//! Slot generation — walk resolved open blocks in duration+buffer steps and
//! emit bookable candidates with remaining capacity.
//!
//! Candidate starts advance by `duration + buffer` from each block's start
//! (back-to-back generation, not minute-granularity packing). The booking
//! span (duration only) must fit entirely inside one open block; the buffer
//! tail is dead time, not a booking commitment, and may overhang the block
//! end. Candidates whose remaining capacity is zero are dropped, never
//! emitted with capacity 0.

use chrono::{Duration, NaiveDate};

use crate::error::Result;
use crate::occupancy::Occupancy;
use crate::tz::TzMapper;
use crate::types::{AvailableSlot, Service, TimeBlock};

/// Generate the chronological slot list for one civil day.
///
/// `blocks` is the day resolver's output for `date`; closed blocks are
/// skipped. Occupancy is queried over each candidate's UTC booking span and
/// the worst-case concurrency is subtracted from the block's capacity.
///
/// The booking span is a fixed real duration: the UTC end is
/// `start + duration_minutes`, not a second civil conversion, so a span
/// touching a DST transition is never shortened or emptied. Candidates whose
/// civil start falls inside a spring-forward gap all resolve to the same
/// post-gap instant; only the first is kept, and the slot's local times
/// report the resolved wall clock.
pub fn generate_slots_for_day(
    blocks: &[TimeBlock],
    date: NaiveDate,
    service: &Service,
    mapper: &TzMapper,
    occupancy: &Occupancy,
) -> Result<Vec<AvailableSlot>> {
    let duration = service.duration_minutes;
    let step = duration + service.buffer_time_minutes;
    let mut slots: Vec<AvailableSlot> = Vec::new();
    // Guard against a zero step; the engine rejects such services up front.
    if duration == 0 {
        return Ok(slots);
    }

    for block in blocks.iter().filter(|b| b.is_available) {
        let mut start = u32::from(block.start_minute);
        // Booking span must fit inside the block; the buffer tail may not.
        while start + duration <= u32::from(block.end_minute) {
            let start_utc = mapper.civil_to_utc(date, start as u16)?;
            let end_utc = start_utc + Duration::minutes(i64::from(duration));

            // Gap-collapsed duplicate: an earlier candidate already resolved
            // to this instant or later.
            if slots.last().is_some_and(|prev| prev.start_datetime >= start_utc) {
                start += step;
                continue;
            }

            let consumed = occupancy.max_consumed_in(start_utc, end_utc);
            let available = block.max_concurrent.saturating_sub(consumed);
            if available > 0 {
                let (_, local_start) = mapper.utc_to_civil(start_utc);
                let (_, local_end) = mapper.utc_to_civil(end_utc);
                slots.push(AvailableSlot {
                    start_datetime: start_utc,
                    end_datetime: end_utc,
                    local_date: date,
                    local_start_time: local_start,
                    local_end_time: local_end,
                    available_capacity: available,
                });
            }
            start += step;
        }
    }

    Ok(slots)
}
