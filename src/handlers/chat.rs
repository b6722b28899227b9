use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, AuthUser};
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use crate::services::chat::{ChatContext, ChatService, FocusedHabit, HabitSummary};
use crate::services::habit::HabitService;
use crate::services::stats;
use crate::utils::time;
use axum::{response::IntoResponse, Extension, Json};
use chrono::Timelike;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_message(value: &str) -> Result<(), ValidationError> {
    if value.trim().len() >= 2 {
        Ok(())
    } else {
        Err(ValidationError::new("message")
            .with_message("Message must be at least 2 characters".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequest {
    /// The user's message (2-1000 characters after trimming)
    #[validate(length(max = 1000), custom(function = "validate_message"))]
    pub message: String,
    /// Optional habit to focus the conversation on
    pub habit_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    /// The coaching reply
    pub reply: String,
}

#[utoipa::path(
    post,
    path = "/api/chat",
    security(("jwt_token" = [])),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Coaching reply generated", body = ChatResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 404, description = "Focused habit not found", body = AppError),
    ),
    tag = "chat"
)]
pub async fn chat(
    Extension(db): Extension<DatabaseConnection>,
    Extension(chat_service): Extension<ChatService>,
    Extension(reminder_config): Extension<crate::config::reminder::ReminderConfig>,
    auth_user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let user_id = parse_user_id(&auth_user)?;
    let offset = reminder_config.utc_offset_minutes;

    let auth_service = AuthService::new(db.clone());
    let user = auth_service.get_user_by_id(user_id).await?;

    let habit_service = HabitService::new(db);
    let habits = habit_service.list_with_stats(user_id, offset).await?;

    let focused = match payload.habit_id {
        Some(habit_id) => {
            let habit = habit_service.get_owned(user_id, habit_id).await?;
            let history = habit_service.full_history(habit.id).await?;
            let recent: Vec<_> = history.into_iter().take(60).collect();
            Some(FocusedHabit {
                title: habit.title,
                habit_type: habit.habit_type,
                frequency: habit.frequency,
                stats: stats::stats_for(&recent),
            })
        }
        None => None,
    };

    let summaries: Vec<HabitSummary> = habits
        .into_iter()
        .map(|h| HabitSummary {
            title: h.habit.title,
            habit_type: h.habit.habit_type,
            frequency: h.habit.frequency,
            stats: h.stats,
        })
        .collect();

    let ctx = ChatContext {
        user_name: format!("{} {}", user.first_name, user.last_name),
        habits: summaries,
        focused,
        message: payload.message,
        local_hour: time::local_now(offset).hour(),
    };

    let reply = chat_service.chat_reply(&ctx).await;

    Ok(ApiResponse::ok(ChatResponse { reply }))
}
