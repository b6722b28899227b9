use crate::error::{AppError, AppResult};
use crate::response::ApiResponse;
use crate::services::email::EmailService;
use axum::{response::IntoResponse, Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactRequest {
    /// Sender name (min 2 characters)
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    /// Reply-to email address
    #[validate(email)]
    pub email: String,
    /// Optional phone number
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    /// Message body (min 10 characters)
    #[validate(length(min = 10, max = 2000))]
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/api/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message forwarded to the operator", body = serde_json::Value),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "contact"
)]
pub async fn send_contact_message(
    Extension(email_service): Extension<EmailService>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    if let Err(e) = email_service
        .send_contact_email(
            &payload.name,
            &payload.email,
            payload.phone.as_deref(),
            &payload.message,
        )
        .await
    {
        tracing::error!("Failed to forward contact message: {e}");
        return Err(AppError::Internal(anyhow::anyhow!(
            "Failed to send contact message"
        )));
    }

    Ok(ApiResponse::ok(
        serde_json::json!({ "message": "Message sent successfully" }),
    ))
}
