//! Day resolution — collapse overlapping rule windows into a minimal ordered
//! sequence of non-overlapping open/closed blocks covering the civil day.
//!
//! Interval sweep with priority layering: rule boundaries partition
//! `[00:00, 24:00)` into atomic sub-intervals, each governed by the
//! highest-priority covering window. On a priority tie the blackout
//! (`is_available = false`) window wins; a closed window never silently
//! reopens because an equal-priority open window happened to sort later.
//! Adjacent blocks with identical availability and capacity are merged.

use crate::rules::RuleWindow;
use crate::types::{TimeBlock, MINUTES_PER_DAY};

/// Resolve the matched windows for one day into ordered, non-overlapping
/// [`TimeBlock`]s with total coverage of `[0, 1440)`.
///
/// Sub-intervals covered by no window are CLOSED (`is_available = false`,
/// zero capacity, empty `source_id`). An empty input yields a single
/// all-day closed block.
pub fn resolve_day(windows: &[RuleWindow]) -> Vec<TimeBlock> {
    // Boundary points partition the day into atomic sub-intervals.
    let mut cuts: Vec<u16> = vec![0, MINUTES_PER_DAY];
    for w in windows {
        cuts.push(w.start_minute.min(MINUTES_PER_DAY));
        cuts.push(w.end_minute.min(MINUTES_PER_DAY));
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut blocks: Vec<TimeBlock> = Vec::new();
    for pair in cuts.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if start >= end {
            continue;
        }
        let block = match governing_window(windows, start, end) {
            Some(w) => TimeBlock {
                start_minute: start,
                end_minute: end,
                is_available: w.is_available,
                max_concurrent: w.max_concurrent,
                priority: w.priority,
                source_id: w.source_id.clone(),
            },
            None => closed_block(start, end),
        };
        push_merged(&mut blocks, block);
    }

    if blocks.is_empty() {
        blocks.push(closed_block(0, MINUTES_PER_DAY));
    }
    blocks
}

/// The window that governs the atomic sub-interval `[start, end)`: highest
/// priority among covering windows, blackout winning ties.
fn governing_window<'a>(windows: &'a [RuleWindow], start: u16, end: u16) -> Option<&'a RuleWindow> {
    windows
        .iter()
        .filter(|w| w.start_minute <= start && w.end_minute >= end)
        .max_by_key(|w| (w.priority, !w.is_available))
}

fn closed_block(start: u16, end: u16) -> TimeBlock {
    TimeBlock {
        start_minute: start,
        end_minute: end,
        is_available: false,
        max_concurrent: 0,
        priority: 0,
        source_id: String::new(),
    }
}

/// Append `block`, merging it into the previous block when availability and
/// capacity agree. Merging is an efficiency nicety, not a correctness need.
fn push_merged(blocks: &mut Vec<TimeBlock>, block: TimeBlock) {
    if let Some(last) = blocks.last_mut() {
        if last.end_minute == block.start_minute
            && last.is_available == block.is_available
            && last.max_concurrent == block.max_concurrent
        {
            last.end_minute = block.end_minute;
            return;
        }
    }
    blocks.push(block);
}
