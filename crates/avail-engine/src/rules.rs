//! Rule normalization — match heterogeneous rule records against one civil day.
//!
//! Weekly, daily and monthly rules plus published drops are reduced to a
//! single normalized shape ([`RuleWindow`]) applicable to the day, ready for
//! the resolver's sweep. A day with no matching windows is a valid outcome
//! (fully closed), not an error.

use chrono::{Datelike, NaiveDate};

use crate::types::{minutes_of, DropEvent, RuleKind, ScheduleRule, PRIORITY_DROP};

/// A rule or drop normalized to one civil-day interval in minutes from
/// midnight, `[start_minute, end_minute)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleWindow {
    pub start_minute: u16,
    pub end_minute: u16,
    pub is_available: bool,
    pub max_concurrent: u32,
    pub priority: i32,
    pub source_id: String,
}

/// Does `rule` anchor onto civil day `day`?
///
/// Weekly rules compare `day_of_week` against the day's weekday
/// (0 = Sunday), daily rules compare dates, monthly rules compare the month
/// and, when pinned, the year. Inactive rules never match.
pub fn rule_matches_day(rule: &ScheduleRule, day: NaiveDate) -> bool {
    if !rule.is_active {
        return false;
    }
    match rule.kind {
        RuleKind::Weekly { day_of_week } => {
            u32::from(day_of_week) == day.weekday().num_days_from_sunday()
        }
        RuleKind::Daily { specific_date } => specific_date == day,
        RuleKind::Monthly { month, year } => {
            month == day.month() && year.map_or(true, |y| y == day.year())
        }
    }
}

/// Does `drop` apply to `day` for public slot computation? Unpublished or
/// inactive drops are invisible.
pub fn drop_matches_day(drop: &DropEvent, day: NaiveDate) -> bool {
    drop.is_active && drop.is_published && drop.drop_date == day
}

fn applies_to_service(rule_service: Option<&String>, service_id: &str) -> bool {
    rule_service.map_or(true, |s| s == service_id)
}

/// Normalize every rule and drop that applies to `day` and `service_id` into
/// [`RuleWindow`]s. Drops enter at [`PRIORITY_DROP`], above any rule kind.
pub fn windows_for_day(
    rules: &[ScheduleRule],
    drops: &[DropEvent],
    service_id: &str,
    day: NaiveDate,
) -> Vec<RuleWindow> {
    let mut windows: Vec<RuleWindow> = rules
        .iter()
        .filter(|r| applies_to_service(r.service_id.as_ref(), service_id))
        .filter(|r| rule_matches_day(r, day))
        .map(|r| RuleWindow {
            start_minute: minutes_of(r.start_time),
            end_minute: minutes_of(r.end_time),
            is_available: r.is_available,
            max_concurrent: r.max_concurrent_appointments,
            priority: r.priority,
            source_id: r.id.clone(),
        })
        .collect();

    windows.extend(
        drops
            .iter()
            .filter(|d| applies_to_service(d.service_id.as_ref(), service_id))
            .filter(|d| drop_matches_day(d, day))
            .map(|d| RuleWindow {
                start_minute: minutes_of(d.start_time),
                end_minute: minutes_of(d.end_time),
                is_available: true,
                max_concurrent: d.max_concurrent_appointments,
                priority: PRIORITY_DROP,
                source_id: d.id.clone(),
            }),
    );

    windows
}
