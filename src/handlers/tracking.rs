use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::models::{HabitModel, TrackingModel};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::chat::ChatService;
use crate::services::stats::{self, HabitStats};
use crate::services::tracking::TrackingService;
use crate::utils::time;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_status(value: &str) -> Result<(), ValidationError> {
    if stats::is_valid_status(value) {
        Ok(())
    } else {
        Err(ValidationError::new("status")
            .with_message("Status must be 'done' or 'missed'".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TrackRequest {
    /// Habit to track
    pub habit_id: i32,
    /// "done" or "missed"
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    /// Optional note (max 500 characters)
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTrackingRequest {
    /// "done" or "missed"
    #[validate(custom(function = "validate_status"))]
    pub status: String,
    /// Optional note (max 500 characters)
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingListResponse {
    pub habit: HabitModel,
    #[serde(flatten)]
    pub pagination: PaginatedResponse<TrackingModel>,
    /// Statistics over the entire tracking history, not just this page
    pub stats: HabitStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackResponse {
    pub tracking: TrackingModel,
    /// Statistics over the full history including this entry
    pub stats: HabitStats,
    /// Coaching feedback for this entry
    pub feedback: String,
}

#[utoipa::path(
    post,
    path = "/api/tracking",
    security(("jwt_token" = [])),
    request_body = TrackRequest,
    responses(
        (status = 200, description = "Habit tracked, statistics and feedback returned", body = TrackResponse),
        (status = 400, description = "Validation error or already tracked today", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Habit not found", body = AppError),
    ),
    tag = "tracking"
)]
pub async fn track_habit(
    Extension(db): Extension<DatabaseConnection>,
    Extension(chat_service): Extension<ChatService>,
    Extension(reminder_config): Extension<crate::config::reminder::ReminderConfig>,
    auth_user: AuthUser,
    Json(payload): Json<TrackRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;
    let offset = reminder_config.utc_offset_minutes;

    let service = TrackingService::new(db);
    let (habit, tracking, history) = service
        .track(
            user_id,
            payload.habit_id,
            payload.status.clone(),
            payload.note,
            offset,
        )
        .await?;

    let habit_stats = stats::stats_for(&history);
    let cutoff = time::days_ago(time::local_now(offset), 7);
    let (recent_done, recent_total) = stats::window_counts(&history, cutoff);

    let feedback = chat_service
        .tracking_feedback(
            &habit.title,
            &habit.habit_type,
            &habit_stats,
            recent_done,
            recent_total,
            &payload.status,
        )
        .await;

    Ok(ApiResponse::with_message(
        TrackResponse {
            tracking,
            stats: habit_stats,
            feedback,
        },
        "Habit tracked successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/tracking/{id}",
    security(("jwt_token" = [])),
    params(
        ("id" = i32, Path, description = "Habit ID"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("limit" = Option<u64>, Query, description = "Entries per page"),
    ),
    responses(
        (status = 200, description = "Paginated tracking history with whole-ledger statistics", body = TrackingListResponse),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Habit not found", body = AppError),
    ),
    tag = "tracking"
)]
pub async fn list_tracking(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(habit_id): Path<i32>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;
    let page = pagination.page.unwrap_or(1).max(1);
    let limit = pagination.limit.unwrap_or(30).clamp(1, 100);

    let service = TrackingService::new(db);
    let (habit, items, total, stats) = service.list(user_id, habit_id, page, limit).await?;

    Ok(ApiResponse::ok(TrackingListResponse {
        habit,
        pagination: PaginatedResponse::new(items, total, page, limit),
        stats,
    }))
}

#[utoipa::path(
    put,
    path = "/api/tracking/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Tracking entry ID")),
    request_body = UpdateTrackingRequest,
    responses(
        (status = 200, description = "Tracking entry updated", body = TrackingModel),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Tracking entry not found", body = AppError),
    ),
    tag = "tracking"
)]
pub async fn update_tracking(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTrackingRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;

    let service = TrackingService::new(db);
    let tracking = service
        .update(user_id, id, payload.status, payload.note)
        .await?;

    Ok(ApiResponse::with_message(
        tracking,
        "Tracking entry updated",
    ))
}

#[utoipa::path(
    delete,
    path = "/api/tracking/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Tracking entry ID")),
    responses(
        (status = 200, description = "Tracking entry deleted", body = String),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Tracking entry not found", body = AppError),
    ),
    tag = "tracking"
)]
pub async fn delete_tracking(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = TrackingService::new(db);
    service.delete(user_id, id).await?;

    Ok(ApiResponse::ok("Tracking entry deleted"))
}
