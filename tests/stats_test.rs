use aihabits::models::TrackingModel;
use aihabits::services::stats::{
    compute_stats, count_since, stats_for, window_counts, STATUS_DONE, STATUS_MISSED,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// Newest-first history where entry `i` was tracked `i` days ago.
fn history(statuses: &[&str]) -> Vec<TrackingModel> {
    let now = base_time();
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| TrackingModel {
            id: i as i32 + 1,
            habit_id: 1,
            user_id: 1,
            status: status.to_string(),
            note: None,
            tracked_at: now - Duration::days(i as i64),
            created_at: now - Duration::days(i as i64),
            updated_at: now - Duration::days(i as i64),
        })
        .collect()
}

#[test]
fn stats_over_model_history() {
    let h = history(&[STATUS_DONE, STATUS_DONE, STATUS_MISSED, STATUS_DONE]);
    let s = stats_for(&h);
    assert_eq!(s.total_attempts, 4);
    assert_eq!(s.done_count, 3);
    assert_eq!(s.missed_count, 1);
    assert_eq!(s.success_rate, 75.0);
    assert_eq!(s.current_streak, 2);
    assert_eq!(s.longest_streak, 2);
}

#[test]
fn current_streak_requires_done_at_head() {
    let h = history(&[STATUS_MISSED, STATUS_DONE, STATUS_DONE, STATUS_DONE]);
    let s = stats_for(&h);
    assert_eq!(s.current_streak, 0);
    assert_eq!(s.longest_streak, 3);
}

#[test]
fn single_entry_histories() {
    let done = stats_for(&history(&[STATUS_DONE]));
    assert_eq!(done.current_streak, 1);
    assert_eq!(done.success_rate, 100.0);

    let missed = stats_for(&history(&[STATUS_MISSED]));
    assert_eq!(missed.current_streak, 0);
    assert_eq!(missed.success_rate, 0.0);
}

#[test]
fn success_rate_has_one_decimal() {
    let h = history(&[
        STATUS_DONE,
        STATUS_DONE,
        STATUS_MISSED,
        STATUS_DONE,
        STATUS_DONE,
        STATUS_MISSED,
    ]);
    let s = stats_for(&h);
    // 4/6 = 66.666... -> 66.7
    assert_eq!(s.success_rate, 66.7);
}

#[test]
fn count_since_honors_cutoff() {
    let h = history(&[STATUS_DONE; 10]);
    // Entries at 0..=6 days ago fall inside a 7-day cutoff.
    let cutoff = base_time() - Duration::days(6);
    assert_eq!(count_since(&h, cutoff), 7);
    // A cutoff in the future excludes everything.
    assert_eq!(count_since(&h, base_time() + Duration::days(1)), 0);
}

#[test]
fn window_counts_splits_done_and_total() {
    let h = history(&[
        STATUS_DONE,
        STATUS_MISSED,
        STATUS_DONE,
        STATUS_DONE,
        STATUS_MISSED,
    ]);
    let cutoff = base_time() - Duration::days(2);
    let (done, total) = window_counts(&h, cutoff);
    assert_eq!(total, 3);
    assert_eq!(done, 2);
}

#[test]
fn long_alternating_history() {
    let statuses: Vec<&str> = (0..100)
        .map(|i| if i % 2 == 0 { STATUS_DONE } else { STATUS_MISSED })
        .collect();
    let s = compute_stats(statuses.iter().copied());
    assert_eq!(s.total_attempts, 100);
    assert_eq!(s.done_count, 50);
    assert_eq!(s.success_rate, 50.0);
    assert_eq!(s.current_streak, 1);
    assert_eq!(s.longest_streak, 1);
}
