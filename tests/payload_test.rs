use aihabits::handlers::tracking::TrackingListResponse;
use aihabits::models::{habit, tracking};
use aihabits::response::PaginatedResponse;
use aihabits::services::stats;
use chrono::{Duration, Utc};

fn fixture() -> TrackingListResponse {
    let now = Utc::now().naive_utc();
    let habit = habit::Model {
        id: 3,
        user_id: 1,
        title: "Morning run".to_string(),
        habit_type: "build".to_string(),
        target: 1,
        frequency: "daily".to_string(),
        reminder_time: None,
        duration_days: None,
        created_at: now,
        updated_at: now,
    };
    let history: Vec<tracking::Model> = ["done", "missed"]
        .iter()
        .enumerate()
        .map(|(i, status)| tracking::Model {
            id: i as i32 + 1,
            habit_id: 3,
            user_id: 1,
            status: status.to_string(),
            note: None,
            tracked_at: now - Duration::days(i as i64),
            created_at: now,
            updated_at: now,
        })
        .collect();

    TrackingListResponse {
        habit,
        stats: stats::stats_for(&history),
        pagination: PaginatedResponse::new(history, 2, 1, 30),
    }
}

#[test]
fn tracking_list_payload_includes_stats_and_habit() {
    let json = serde_json::to_value(fixture()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

    for expected in ["habit", "items", "total", "page", "per_page", "total_pages", "stats"] {
        assert!(keys.contains(&expected), "missing key {expected}; keys = {keys:?}");
    }

    assert_eq!(json["stats"]["total_attempts"], 2);
    assert_eq!(json["stats"]["done_count"], 1);
    assert_eq!(json["stats"]["success_rate"], 50.0);
    assert_eq!(json["habit"]["title"], "Morning run");
    assert_eq!(json["total"], 2);
}

#[test]
fn tracking_payload_never_leaks_foreign_fields() {
    let json = serde_json::to_value(fixture()).unwrap();
    let entry = &json["items"][0];
    assert!(entry.get("status").is_some());
    assert!(entry.get("tracked_at").is_some());
    // No password or token material anywhere near this payload.
    assert!(entry.get("password_hash").is_none());
}
