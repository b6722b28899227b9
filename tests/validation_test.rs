use aihabits::handlers::auth::RegisterRequest;
use aihabits::handlers::chat::ChatRequest;
use aihabits::handlers::habit::HabitRequest;
use aihabits::handlers::tracking::TrackRequest;
use validator::Validate;

fn habit_request() -> HabitRequest {
    HabitRequest {
        title: "Morning run".to_string(),
        habit_type: "build".to_string(),
        target: 1,
        frequency: "daily".to_string(),
        reminder_time: None,
        duration_days: None,
    }
}

#[test]
fn valid_habit_passes() {
    assert!(habit_request().validate().is_ok());
}

#[test]
fn habit_title_too_short() {
    let mut req = habit_request();
    req.title = "a".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn habit_title_length_is_checked_after_trimming() {
    let mut req = habit_request();
    req.title = " a ".to_string();
    assert!(req.validate().is_err());
    req.title = " ab ".to_string();
    assert!(req.validate().is_ok());
}

#[test]
fn habit_type_must_be_build_or_quit() {
    let mut req = habit_request();
    req.habit_type = "quit".to_string();
    assert!(req.validate().is_ok());
    req.habit_type = "stop".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn habit_frequency_must_be_daily_or_weekly() {
    let mut req = habit_request();
    req.frequency = "weekly".to_string();
    assert!(req.validate().is_ok());
    req.frequency = "monthly".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn habit_target_range() {
    let mut req = habit_request();
    req.target = 365;
    assert!(req.validate().is_ok());
    req.target = 0;
    assert!(req.validate().is_err());
    req.target = 366;
    assert!(req.validate().is_err());
}

#[test]
fn habit_reminder_time_format() {
    let mut req = habit_request();
    req.reminder_time = Some("21:00".to_string());
    assert!(req.validate().is_ok());
    req.reminder_time = Some("25:00".to_string());
    assert!(req.validate().is_err());
    req.reminder_time = Some("evening".to_string());
    assert!(req.validate().is_err());
}

#[test]
fn habit_duration_range() {
    let mut req = habit_request();
    req.duration_days = Some(30);
    assert!(req.validate().is_ok());
    req.duration_days = Some(0);
    assert!(req.validate().is_err());
}

#[test]
fn tracking_status_must_be_done_or_missed() {
    let mut req = TrackRequest {
        habit_id: 1,
        status: "done".to_string(),
        note: None,
    };
    assert!(req.validate().is_ok());
    req.status = "missed".to_string();
    assert!(req.validate().is_ok());
    req.status = "skipped".to_string();
    assert!(req.validate().is_err());
}

#[test]
fn tracking_note_length_capped() {
    let req = TrackRequest {
        habit_id: 1,
        status: "done".to_string(),
        note: Some("x".repeat(501)),
    };
    assert!(req.validate().is_err());
}

#[test]
fn register_request_rules() {
    let valid = RegisterRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: "s3cret-password".to_string(),
    };
    assert!(valid.validate().is_ok());

    let bad_email = RegisterRequest {
        email: "not-an-email".to_string(),
        ..register_like(&valid)
    };
    assert!(bad_email.validate().is_err());

    let short_password = RegisterRequest {
        password: "short".to_string(),
        ..register_like(&valid)
    };
    assert!(short_password.validate().is_err());

    let short_name = RegisterRequest {
        first_name: "A".to_string(),
        ..register_like(&valid)
    };
    assert!(short_name.validate().is_err());

    let padded_short_name = RegisterRequest {
        first_name: " a ".to_string(),
        ..register_like(&valid)
    };
    assert!(padded_short_name.validate().is_err());
}

#[test]
fn chat_message_needs_two_chars_after_trim() {
    let mut req = ChatRequest {
        message: "How do I build a streak?".to_string(),
        habit_id: None,
    };
    assert!(req.validate().is_ok());

    req.message = "a".to_string();
    assert!(req.validate().is_err());

    req.message = " a ".to_string();
    assert!(req.validate().is_err());

    req.message = "hi".to_string();
    assert!(req.validate().is_ok());

    req.message = "x".repeat(1001);
    assert!(req.validate().is_err());
}

fn register_like(req: &RegisterRequest) -> RegisterRequest {
    RegisterRequest {
        first_name: req.first_name.clone(),
        last_name: req.last_name.clone(),
        email: req.email.clone(),
        password: req.password.clone(),
    }
}
