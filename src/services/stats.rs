//! Derived habit statistics. Pure functions over the tracking history,
//! always ordered newest-first; nothing here touches the database.

use crate::models::TrackingModel;
use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

pub const STATUS_DONE: &str = "done";
pub const STATUS_MISSED: &str = "missed";

pub fn is_valid_status(status: &str) -> bool {
    status == STATUS_DONE || status == STATUS_MISSED
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct HabitStats {
    pub total_attempts: u64,
    pub done_count: u64,
    pub missed_count: u64,
    /// Percentage of done attempts, one decimal. Exactly 0 for an empty
    /// history.
    pub success_rate: f64,
    /// Consecutive done entries counted from the newest record backward,
    /// broken by the first missed.
    pub current_streak: u64,
    /// Longest consecutive-done run anywhere in the history.
    pub longest_streak: u64,
}

/// Compute the full statistics block from a newest-first status sequence.
///
/// Single scan with a running consecutive-done counter: the counter resets
/// on every missed entry, its value over the prefix ending at the newest
/// record is the current streak, and its maximum over the whole scan is the
/// longest streak. The result is order-sensitive by design.
pub fn compute_stats<'a, I>(statuses_newest_first: I) -> HabitStats
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0u64;
    let mut done = 0u64;
    let mut current_streak = 0u64;
    let mut longest_streak = 0u64;
    let mut run = 0u64;
    let mut leading_run_unbroken = true;

    for status in statuses_newest_first {
        total += 1;
        if status == STATUS_DONE {
            done += 1;
            run += 1;
            longest_streak = longest_streak.max(run);
            if leading_run_unbroken {
                current_streak = run;
            }
        } else {
            run = 0;
            leading_run_unbroken = false;
        }
    }

    HabitStats {
        total_attempts: total,
        done_count: done,
        missed_count: total - done,
        success_rate: rate_percent(done, total),
        current_streak,
        longest_streak,
    }
}

/// done/total as a percentage rounded to one decimal; 0 for zero attempts.
pub fn rate_percent(done: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Statistics over a habit's full tracking history (newest first).
pub fn stats_for(history_newest_first: &[TrackingModel]) -> HabitStats {
    compute_stats(history_newest_first.iter().map(|t| t.status.as_str()))
}

/// Entries tracked at or after `cutoff`.
pub fn count_since(history: &[TrackingModel], cutoff: NaiveDateTime) -> u64 {
    history.iter().filter(|t| t.tracked_at >= cutoff).count() as u64
}

/// (done, total) within the window starting at `cutoff`.
pub fn window_counts(history: &[TrackingModel], cutoff: NaiveDateTime) -> (u64, u64) {
    let mut done = 0u64;
    let mut total = 0u64;
    for t in history.iter().filter(|t| t.tracked_at >= cutoff) {
        total += 1;
        if t.status == STATUS_DONE {
            done += 1;
        }
    }
    (done, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(statuses: &[&str]) -> HabitStats {
        compute_stats(statuses.iter().copied())
    }

    #[test]
    fn empty_history_is_all_zero() {
        let s = stats(&[]);
        assert_eq!(s.total_attempts, 0);
        assert_eq!(s.success_rate, 0.0);
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 0);
    }

    #[test]
    fn streak_broken_by_missed_in_middle() {
        // newest -> oldest
        let s = stats(&["done", "done", "missed", "done"]);
        assert_eq!(s.current_streak, 2);
        assert_eq!(s.longest_streak, 2);
        assert_eq!(s.success_rate, 75.0);
    }

    #[test]
    fn missed_at_head_zeroes_current_streak() {
        let s = stats(&["missed", "done", "done", "done"]);
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 3);
    }

    #[test]
    fn all_done() {
        let s = stats(&["done", "done", "done"]);
        assert_eq!(s.current_streak, 3);
        assert_eq!(s.longest_streak, 3);
        assert_eq!(s.success_rate, 100.0);
        assert_eq!(s.missed_count, 0);
    }

    #[test]
    fn all_missed() {
        let s = stats(&["missed", "missed"]);
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 0);
        assert_eq!(s.success_rate, 0.0);
        assert_eq!(s.done_count, 0);
    }

    #[test]
    fn longest_run_later_in_history() {
        // current run of 1, older run of 4
        let s = stats(&["done", "missed", "done", "done", "done", "done"]);
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.longest_streak, 4);
    }

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(rate_percent(1, 3), 33.3);
        assert_eq!(rate_percent(2, 3), 66.7);
        assert_eq!(rate_percent(0, 0), 0.0);
        assert_eq!(rate_percent(0, 5), 0.0);
    }

    #[test]
    fn status_validity() {
        assert!(is_valid_status("done"));
        assert!(is_valid_status("missed"));
        assert!(!is_valid_status("skipped"));
        assert!(!is_valid_status("Done"));
    }
}
