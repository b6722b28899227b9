use aihabits::models::{habit, tracking, user, verification_token};
use aihabits::services::auth::AuthService;
use aihabits::services::habit::HabitService;
use aihabits::services::tracking::TrackingService;
use aihabits::AppError;
use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use std::sync::Once;

static INIT: Once = Once::new();

fn init_jwt() {
    INIT.call_once(|| {
        std::env::set_var(
            "JWT_SECRET",
            "an_integration_test_secret_key_32_chars!",
        );
        let cfg = aihabits::config::jwt::JwtConfig::from_env().unwrap();
        let _ = aihabits::utils::jwt::init_jwt_config(cfg);
    });
}

fn sample_user(id: i32, verified: bool) -> user::Model {
    let now = Utc::now().naive_utc();
    user::Model {
        id,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password_hash: "$2b$12$hash".to_string(),
        role: "user".to_string(),
        is_verified: verified,
        created_at: now,
        updated_at: now,
    }
}

fn sample_habit(id: i32, user_id: i32) -> habit::Model {
    let now = Utc::now().naive_utc();
    habit::Model {
        id,
        user_id,
        title: "Morning run".to_string(),
        habit_type: "build".to_string(),
        target: 1,
        frequency: "daily".to_string(),
        reminder_time: None,
        duration_days: None,
        created_at: now,
        updated_at: now,
    }
}

fn sample_tracking(id: i32, habit_id: i32, status: &str, tracked_at: NaiveDateTime) -> tracking::Model {
    tracking::Model {
        id,
        habit_id,
        user_id: 1,
        status: status.to_string(),
        note: None,
        tracked_at,
        created_at: tracked_at,
        updated_at: tracked_at,
    }
}

#[tokio::test]
async fn verification_code_cannot_be_redeemed_twice() {
    init_jwt();
    let now = Utc::now().naive_utc();
    let token_row = verification_token::Model {
        id: 1,
        user_id: 7,
        token: "654321".to_string(),
        expires_at: now + Duration::hours(24),
        created_at: now,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // first redemption: token lookup, user fetch, verified update
        .append_query_results([vec![token_row]])
        .append_query_results([vec![sample_user(7, false)]])
        .append_query_results([vec![sample_user(7, true)]])
        // second redemption: the token row is gone
        .append_query_results([Vec::<verification_token::Model>::new()])
        // token delete
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let service = AuthService::new(db);

    let (verified, session) = service.verify_email("654321").await.unwrap();
    assert!(verified.is_verified);
    assert!(!session.is_empty());

    let err = service.verify_email("654321").await.unwrap_err();
    assert!(
        matches!(err, AppError::Validation(ref msg) if msg.contains("Invalid or expired")),
        "second redemption should fail: {err:?}"
    );
}

#[tokio::test]
async fn second_tracking_same_day_is_rejected() {
    let today = Utc::now().naive_utc();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_habit(3, 1)]])
        // same-day range query finds an existing entry
        .append_query_results([vec![sample_tracking(10, 3, "done", today)]])
        .into_connection();

    let service = TrackingService::new(db);
    let err = service
        .track(1, 3, "done".to_string(), None, 0)
        .await
        .unwrap_err();

    match err {
        AppError::Conflict(msg) => assert!(msg.contains("already tracked")),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn deleting_habit_removes_its_tracking_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_habit(3, 1)]])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 4,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();

    let service = HabitService::new(db.clone());
    service.delete(1, 3).await.unwrap();

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains(r#"DELETE FROM "trackings""#), "log: {log}");
    assert!(log.contains(r#"DELETE FROM "habits""#), "log: {log}");
}

#[tokio::test]
async fn tracking_list_stats_cover_whole_history_not_the_page() {
    let now = Utc::now().naive_utc();
    let history = vec![
        sample_tracking(4, 3, "done", now),
        sample_tracking(3, 3, "done", now - Duration::days(1)),
        sample_tracking(2, 3, "missed", now - Duration::days(2)),
        sample_tracking(1, 3, "done", now - Duration::days(3)),
    ];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_habit(3, 1)]])
        .append_query_results([history])
        .into_connection();

    let service = TrackingService::new(db);
    let (habit, items, total, stats) = service.list(1, 3, 1, 2).await.unwrap();

    assert_eq!(habit.id, 3);
    assert_eq!(items.len(), 2, "page holds two entries");
    assert_eq!(total, 4, "total counts the whole ledger");
    assert_eq!(stats.total_attempts, 4);
    assert_eq!(stats.done_count, 3);
    assert_eq!(stats.success_rate, 75.0);
    assert_eq!(stats.current_streak, 2);
}
