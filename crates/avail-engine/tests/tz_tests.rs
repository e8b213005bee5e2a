//! Tests for civil/UTC translation and the DST resolution policies.

use avail_engine::error::AvailabilityError;
use avail_engine::tz::TzMapper;
use chrono::{NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Zone parsing ────────────────────────────────────────────────────────────

#[test]
fn unknown_zone_is_a_typed_error() {
    let err = TzMapper::new("America/Nowhere").unwrap_err();
    assert!(matches!(err, AvailabilityError::InvalidTimezone(_)));
}

#[test]
fn zone_name_round_trips() {
    let mapper = TzMapper::new("America/Los_Angeles").unwrap();
    assert_eq!(mapper.zone_name(), "America/Los_Angeles");
}

// ── Plain conversion and round trip ─────────────────────────────────────────

#[test]
fn civil_to_utc_respects_standard_and_daylight_offsets() {
    let mapper = TzMapper::new("America/Los_Angeles").unwrap();

    // January 16: PST, UTC-8.
    let winter = mapper.civil_to_utc(date(2026, 1, 16), 9 * 60).unwrap();
    assert_eq!(winter, Utc.with_ymd_and_hms(2026, 1, 16, 17, 0, 0).unwrap());

    // March 16 (after spring forward): PDT, UTC-7.
    let summer = mapper.civil_to_utc(date(2026, 3, 16), 9 * 60).unwrap();
    assert_eq!(summer, Utc.with_ymd_and_hms(2026, 3, 16, 16, 0, 0).unwrap());
}

#[test]
fn round_trip_away_from_transitions_is_exact() {
    let mapper = TzMapper::new("Europe/London").unwrap();
    let day = date(2026, 6, 10);
    let instant = mapper.civil_to_utc(day, 14 * 60 + 30).unwrap();
    let (back_date, back_time) = mapper.utc_to_civil(instant);
    assert_eq!(back_date, day);
    assert_eq!(back_time.format("%H:%M").to_string(), "14:30");
}

#[test]
fn minute_1440_rolls_into_next_civil_day() {
    let mapper = TzMapper::new("UTC").unwrap();
    let instant = mapper.civil_to_utc(date(2026, 3, 16), 1440).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 17, 0, 0, 0).unwrap());
}

// ── Spring forward (gap) ────────────────────────────────────────────────────

#[test]
fn gap_time_maps_to_first_valid_instant_after_the_gap() {
    // US spring forward 2026: March 8, 02:00 -> 03:00 local.
    let mapper = TzMapper::new("America/Los_Angeles").unwrap();
    let instant = mapper.civil_to_utc(date(2026, 3, 8), 2 * 60 + 30).unwrap();
    // 02:30 does not exist; the first valid instant is 03:00 PDT = 10:00 UTC.
    assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 8, 10, 0, 0).unwrap());
}

#[test]
fn gap_resolution_is_deterministic() {
    let mapper = TzMapper::new("America/Los_Angeles").unwrap();
    let a = mapper.civil_to_utc(date(2026, 3, 8), 150).unwrap();
    let b = mapper.civil_to_utc(date(2026, 3, 8), 150).unwrap();
    assert_eq!(a, b);
}

// ── Fall back (overlap) ─────────────────────────────────────────────────────

#[test]
fn ambiguous_time_resolves_to_first_occurrence() {
    // US fall back 2026: November 1, 02:00 -> 01:00 local. 01:30 happens
    // twice; the first occurrence is still PDT (UTC-7), i.e. 08:30 UTC.
    let mapper = TzMapper::new("America/Los_Angeles").unwrap();
    let instant = mapper.civil_to_utc(date(2026, 11, 1), 90).unwrap();
    assert_eq!(instant, Utc.with_ymd_and_hms(2026, 11, 1, 8, 30, 0).unwrap());
}

#[test]
fn utc_to_civil_matches_zone_wall_clock() {
    let mapper = TzMapper::new("Asia/Tokyo").unwrap();
    // Tokyo is UTC+9, no DST.
    let instant = Utc.with_ymd_and_hms(2026, 3, 16, 15, 30, 0).unwrap();
    let (d, t) = mapper.utc_to_civil(instant);
    assert_eq!(d, date(2026, 3, 17));
    assert_eq!(t.format("%H:%M").to_string(), "00:30");
}
