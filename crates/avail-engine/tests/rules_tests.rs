//! Tests for rule/drop matching and normalization against a civil day.

use avail_engine::rules::{drop_matches_day, rule_matches_day, windows_for_day};
use avail_engine::types::{
    DropEvent, RuleKind, ScheduleRule, PRIORITY_DROP, PRIORITY_MONTHLY, PRIORITY_WEEKLY,
};
use chrono::{NaiveDate, NaiveTime};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn t(hhmm: &str) -> NaiveTime {
    NaiveTime::parse_from_str(hhmm, "%H:%M").unwrap()
}

fn d(iso: &str) -> NaiveDate {
    iso.parse().unwrap()
}

fn rule(id: &str, kind: RuleKind) -> ScheduleRule {
    ScheduleRule {
        id: id.to_string(),
        storefront_id: "sf1".to_string(),
        service_id: None,
        kind,
        start_time: t("09:00"),
        end_time: t("17:00"),
        is_available: true,
        max_concurrent_appointments: 2,
        priority: kind.default_priority(),
        is_active: true,
    }
}

fn drop_on(date: &str) -> DropEvent {
    DropEvent {
        id: "drop1".to_string(),
        storefront_id: "sf1".to_string(),
        service_id: None,
        drop_date: d(date),
        start_time: t("12:00"),
        end_time: t("14:00"),
        max_concurrent_appointments: 1,
        is_published: true,
        is_active: true,
    }
}

// ── Anchor matching ─────────────────────────────────────────────────────────

#[test]
fn weekly_rule_matches_its_weekday_with_sunday_as_zero() {
    // 2026-03-15 is a Sunday, 2026-03-16 a Monday.
    let sunday = rule("sun", RuleKind::Weekly { day_of_week: 0 });
    let monday = rule("mon", RuleKind::Weekly { day_of_week: 1 });

    assert!(rule_matches_day(&sunday, d("2026-03-15")));
    assert!(!rule_matches_day(&sunday, d("2026-03-16")));
    assert!(rule_matches_day(&monday, d("2026-03-16")));
    // And the week after.
    assert!(rule_matches_day(&monday, d("2026-03-23")));
}

#[test]
fn daily_rule_matches_only_its_date() {
    let r = rule("day", RuleKind::Daily { specific_date: d("2026-03-23") });
    assert!(rule_matches_day(&r, d("2026-03-23")));
    assert!(!rule_matches_day(&r, d("2026-03-22")));
    assert!(!rule_matches_day(&r, d("2027-03-23")));
}

#[test]
fn monthly_rule_without_year_recurs_every_year() {
    let r = rule("dec", RuleKind::Monthly { month: 12, year: None });
    assert!(rule_matches_day(&r, d("2026-12-05")));
    assert!(rule_matches_day(&r, d("2027-12-31")));
    assert!(!rule_matches_day(&r, d("2026-11-30")));
}

#[test]
fn monthly_rule_with_year_is_pinned() {
    let r = rule("dec26", RuleKind::Monthly { month: 12, year: Some(2026) });
    assert!(rule_matches_day(&r, d("2026-12-05")));
    assert!(!rule_matches_day(&r, d("2027-12-05")));
}

#[test]
fn inactive_rules_never_match() {
    let mut r = rule("mon", RuleKind::Weekly { day_of_week: 1 });
    r.is_active = false;
    assert!(!rule_matches_day(&r, d("2026-03-16")));
}

// ── Drop gates ──────────────────────────────────────────────────────────────

#[test]
fn drop_requires_published_active_and_exact_date() {
    let published = drop_on("2026-03-23");
    assert!(drop_matches_day(&published, d("2026-03-23")));
    assert!(!drop_matches_day(&published, d("2026-03-24")));

    let mut unpublished = drop_on("2026-03-23");
    unpublished.is_published = false;
    assert!(!drop_matches_day(&unpublished, d("2026-03-23")));

    let mut inactive = drop_on("2026-03-23");
    inactive.is_active = false;
    assert!(!drop_matches_day(&inactive, d("2026-03-23")));
}

// ── Normalization ───────────────────────────────────────────────────────────

#[test]
fn windows_carry_times_capacity_and_priority() {
    let rules = vec![
        rule("mon", RuleKind::Weekly { day_of_week: 1 }),
        rule("mar", RuleKind::Monthly { month: 3, year: None }),
        rule("tue", RuleKind::Weekly { day_of_week: 2 }),
    ];
    let drops = vec![drop_on("2026-03-16")];

    let windows = windows_for_day(&rules, &drops, "svc1", d("2026-03-16"));
    assert_eq!(windows.len(), 3);

    let mon = windows.iter().find(|w| w.source_id == "mon").unwrap();
    assert_eq!((mon.start_minute, mon.end_minute), (540, 1020));
    assert_eq!(mon.priority, PRIORITY_WEEKLY);
    assert_eq!(mon.max_concurrent, 2);
    assert!(mon.is_available);

    let mar = windows.iter().find(|w| w.source_id == "mar").unwrap();
    assert_eq!(mar.priority, PRIORITY_MONTHLY);

    // Drops normalize as open windows at the top priority.
    let drop = windows.iter().find(|w| w.source_id == "drop1").unwrap();
    assert_eq!(drop.priority, PRIORITY_DROP);
    assert_eq!((drop.start_minute, drop.end_minute), (720, 840));
    assert!(drop.is_available);
}

#[test]
fn service_scoped_records_filter_by_service() {
    let mut scoped = rule("svc2-only", RuleKind::Weekly { day_of_week: 1 });
    scoped.service_id = Some("svc2".to_string());
    let shared = rule("all", RuleKind::Weekly { day_of_week: 1 });

    let windows = windows_for_day(&[scoped, shared], &[], "svc1", d("2026-03-16"));
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].source_id, "all");
}

#[test]
fn no_matches_is_an_empty_normalization_not_an_error() {
    let rules = vec![rule("mon", RuleKind::Weekly { day_of_week: 1 })];
    // Wednesday.
    let windows = windows_for_day(&rules, &[], "svc1", d("2026-03-18"));
    assert!(windows.is_empty());
}
