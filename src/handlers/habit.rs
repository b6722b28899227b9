use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::{HabitModel, TrackingModel};
use crate::response::ApiResponse;
use crate::services::habit::{HabitInput, HabitService};
use crate::services::stats::HabitStats;
use crate::utils::time;
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_title(value: &str) -> Result<(), ValidationError> {
    if value.trim().len() >= 2 {
        Ok(())
    } else {
        Err(ValidationError::new("title")
            .with_message("Title must be at least 2 characters".into()))
    }
}

fn validate_habit_type(value: &str) -> Result<(), ValidationError> {
    match value {
        "build" | "quit" => Ok(()),
        _ => Err(ValidationError::new("habit_type")
            .with_message("Type must be 'build' or 'quit'".into())),
    }
}

fn validate_frequency(value: &str) -> Result<(), ValidationError> {
    match value {
        "daily" | "weekly" => Ok(()),
        _ => Err(ValidationError::new("frequency")
            .with_message("Frequency must be 'daily' or 'weekly'".into())),
    }
}

fn validate_reminder_time(value: &str) -> Result<(), ValidationError> {
    if time::is_valid_hhmm(value) {
        Ok(())
    } else {
        Err(ValidationError::new("reminder_time")
            .with_message("Reminder time must be in HH:MM format".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HabitRequest {
    /// Habit title (min 2 characters after trimming)
    #[validate(length(max = 100), custom(function = "validate_title"))]
    pub title: String,
    /// Habit type: "build" or "quit"
    #[validate(custom(function = "validate_habit_type"))]
    pub habit_type: String,
    /// Daily/weekly target count (1-365)
    #[validate(range(min = 1, max = 365))]
    pub target: i32,
    /// Frequency: "daily" or "weekly"
    #[validate(custom(function = "validate_frequency"))]
    pub frequency: String,
    /// Optional reminder time in HH:MM (24h)
    #[validate(custom(function = "validate_reminder_time"))]
    pub reminder_time: Option<String>,
    /// Optional program length in days (1-365)
    #[validate(range(min = 1, max = 365))]
    pub duration_days: Option<i32>,
}

impl HabitRequest {
    fn into_input(self) -> HabitInput {
        HabitInput {
            title: self.title,
            habit_type: self.habit_type,
            target: self.target,
            frequency: self.frequency,
            reminder_time: self.reminder_time,
            duration_days: self.duration_days,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HabitResponse {
    #[serde(flatten)]
    pub habit: HabitModel,
    pub stats: HabitStats,
    /// Tracking entries within the trailing 7 days
    pub recent_tracking: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HabitDetailResponse {
    #[serde(flatten)]
    pub habit: HabitModel,
    /// Most recent tracking entries, newest first (up to 30)
    pub history: Vec<TrackingModel>,
}

#[utoipa::path(
    post,
    path = "/api/habits",
    security(("jwt_token" = [])),
    request_body = HabitRequest,
    responses(
        (status = 200, description = "Habit created successfully", body = HabitModel),
        (status = 400, description = "Validation error or duplicate title", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "habits"
)]
pub async fn create_habit(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<HabitRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;

    let service = HabitService::new(db);
    let habit = service.create(user_id, payload.into_input()).await?;

    Ok(ApiResponse::with_message(
        habit,
        "Habit created successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/habits",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "All habits with statistics, newest first", body = Vec<HabitResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "habits"
)]
pub async fn list_habits(
    Extension(db): Extension<DatabaseConnection>,
    Extension(reminder_config): Extension<crate::config::reminder::ReminderConfig>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = HabitService::new(db);
    let habits = service
        .list_with_stats(user_id, reminder_config.utc_offset_minutes)
        .await?;

    let habits: Vec<HabitResponse> = habits
        .into_iter()
        .map(|h| HabitResponse {
            habit: h.habit,
            stats: h.stats,
            recent_tracking: h.recent_tracking,
        })
        .collect();

    Ok(ApiResponse::ok(habits))
}

#[utoipa::path(
    get,
    path = "/api/habits/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    responses(
        (status = 200, description = "Habit with recent history", body = HabitDetailResponse),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Habit not found", body = AppError),
    ),
    tag = "habits"
)]
pub async fn get_habit(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = HabitService::new(db);
    let (habit, history) = service.get_with_history(user_id, id).await?;

    Ok(ApiResponse::ok(HabitDetailResponse { habit, history }))
}

#[utoipa::path(
    put,
    path = "/api/habits/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    request_body = HabitRequest,
    responses(
        (status = 200, description = "Habit updated successfully", body = HabitModel),
        (status = 400, description = "Validation error or duplicate title", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Habit not found", body = AppError),
    ),
    tag = "habits"
)]
pub async fn update_habit(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<HabitRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;

    let service = HabitService::new(db);
    let habit = service.update(user_id, id, payload.into_input()).await?;

    Ok(ApiResponse::with_message(
        habit,
        "Habit updated successfully",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/habits/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Habit ID")),
    responses(
        (status = 200, description = "Habit and its tracking history deleted", body = String),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Habit not found", body = AppError),
    ),
    tag = "habits"
)]
pub async fn delete_habit(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = HabitService::new(db);
    service.delete(user_id, id).await?;

    Ok(ApiResponse::ok("Habit deleted successfully"))
}
