//! Availability model: free/busy window computation.
//!
//! Turns a user's existing events and working-hours preferences into an
//! ordered, non-overlapping sequence of free windows over a time range.

use chrono::{Datelike, Duration};

use crate::models::{Event, SchedulingPreferences, TimeWindow};

/// Merge a set of windows into ordered, disjoint busy blocks.
///
/// Overlapping and adjacent windows are coalesced. The output is sorted by
/// start time.
pub fn merge_busy_blocks(windows: &[TimeWindow]) -> Vec<TimeWindow> {
    let mut sorted: Vec<TimeWindow> = windows.to_vec();
    sorted.sort_by_key(|w| (w.start(), w.end()));

    let mut merged: Vec<TimeWindow> = Vec::with_capacity(sorted.len());
    for win in sorted {
        match merged.last_mut() {
            // Adjacent blocks (end == next start) merge as well.
            Some(last) if win.start() <= last.end() => {
                if win.end() > last.end() {
                    *last = TimeWindow::new(last.start(), win.end())
                        .expect("merged block keeps start < end");
                }
            }
            _ => merged.push(win),
        }
    }
    merged
}

/// Compute the free windows for a user over `range`.
///
/// For each day in `range`, the working-hours window (with per-day
/// overrides) is intersected with `range`, and the merged busy blocks are
/// subtracted from it. Events spanning multiple days are clipped to each
/// day's working window.
///
/// The result is ordered by start time and non-overlapping, and together
/// with the clipped busy blocks exactly tiles the working-hours range.
pub fn free_windows(
    events: &[Event],
    preferences: &SchedulingPreferences,
    range: TimeWindow,
) -> Vec<TimeWindow> {
    let busy = merge_busy_blocks(&events.iter().map(|e| e.window).collect::<Vec<_>>());

    let mut free = Vec::new();
    let mut day = range.start().date_naive();
    let last_day = range.end().date_naive();

    while day <= last_day {
        if let Some((work_start, work_end)) = preferences.hours_for(day.weekday()) {
            let day_window = TimeWindow::new(
                day.and_time(work_start).and_utc(),
                day.and_time(work_end).and_utc(),
            )
            .expect("working hours have start < end");

            if let Some(day_window) = day_window.intersect(&range) {
                subtract_busy(day_window, &busy, &mut free);
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    free
}

/// Subtract `blocks` from each of `windows`, returning the remaining free
/// pieces in order.
///
/// Used by the orchestrator to carve accepted placements out of the free
/// windows as a pass progresses.
pub fn subtract_blocks(windows: &[TimeWindow], blocks: &[TimeWindow]) -> Vec<TimeWindow> {
    let merged = merge_busy_blocks(blocks);
    let mut out = Vec::new();
    for window in windows {
        subtract_busy(*window, &merged, &mut out);
    }
    out
}

/// Append the complement of `busy` within `bounds` to `out`.
fn subtract_busy(bounds: TimeWindow, busy: &[TimeWindow], out: &mut Vec<TimeWindow>) {
    let mut cursor = bounds.start();
    for block in busy {
        let Some(clipped) = block.intersect(&bounds) else {
            continue;
        };
        if clipped.start() > cursor {
            out.push(
                TimeWindow::new(cursor, clipped.start()).expect("gap before block is non-empty"),
            );
        }
        cursor = cursor.max(clipped.end());
        if cursor >= bounds.end() {
            return;
        }
    }
    if cursor < bounds.end() {
        out.push(TimeWindow::new(cursor, bounds.end()).expect("tail gap is non-empty"));
    }
}

/// Total free time across a set of windows.
pub fn total_free_time(windows: &[TimeWindow]) -> Duration {
    windows
        .iter()
        .fold(Duration::zero(), |acc, w| acc + w.duration())
}
