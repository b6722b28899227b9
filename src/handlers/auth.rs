use crate::error::{AppError, AppResult};
use crate::middleware::auth::{parse_user_id, require_admin, AuthUser};
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use crate::services::email::EmailService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().len() >= 2 {
        Ok(())
    } else {
        Err(ValidationError::new("name").with_message("Must be at least 2 characters".into()))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// First name (min 2 characters after trimming)
    #[validate(length(max = 50), custom(function = "validate_name"))]
    pub first_name: String,
    /// Last name (min 2 characters after trimming)
    #[validate(length(max = 50), custom(function = "validate_name"))]
    pub last_name: String,
    /// Email address
    #[validate(email)]
    pub email: String,
    /// Password (min 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// User password
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// User ID
    pub id: i32,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// User role (user, admin)
    pub role: String,
    /// Whether the email address has been verified
    pub is_verified: bool,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Session token
    pub token: String,
    /// The authenticated user
    pub user: UserResponse,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered, verification code sent", body = serde_json::Value),
        (status = 400, description = "Validation error or email already registered", body = AppError),
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = AuthService::new(db);
    let user = service
        .register(
            &payload.first_name,
            &payload.last_name,
            &payload.email,
            &payload.password,
            &email_service,
        )
        .await?;

    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "Registration successful. Please check your email for the verification code.",
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or unverified email", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(db);
    let (user, token) = service.login(&payload.email, &payload.password).await?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    /// 6-digit verification code
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified, session token issued", body = AuthResponse),
        (status = 400, description = "Invalid or expired verification token", body = AppError),
    ),
    tag = "auth"
)]
pub async fn verify_email(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<VerifyEmailRequest>,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(db);
    let (user, token) = service.verify_email(&payload.token).await?;

    Ok(ApiResponse::with_message(
        AuthResponse {
            token,
            user: UserResponse::from(user),
        },
        "Email verified successfully",
    ))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendVerificationRequest {
    /// Email address
    #[validate(email)]
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification code re-sent", body = serde_json::Value),
        (status = 400, description = "Email is already verified", body = AppError),
        (status = 404, description = "No account with this email", body = AppError),
    ),
    tag = "auth"
)]
pub async fn resend_verification(
    Extension(db): Extension<DatabaseConnection>,
    Extension(email_service): Extension<EmailService>,
    Json(payload): Json<ResendVerificationRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = AuthService::new(db);
    service
        .resend_verification(&payload.email, &email_service)
        .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({ "message": "Verification email sent" }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current user retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn get_current_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let user_id = parse_user_id(&auth_user)?;

    let service = AuthService::new(db);
    let user = service.get_user_by_id(user_id).await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    /// First name (min 2 characters after trimming)
    #[validate(length(max = 50), custom(function = "validate_name"))]
    pub first_name: Option<String>,
    /// Last name (min 2 characters after trimming)
    #[validate(length(max = 50), custom(function = "validate_name"))]
    pub last_name: Option<String>,
    /// Email address
    #[validate(email)]
    pub email: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    security(("jwt_token" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated successfully", body = UserResponse),
        (status = 400, description = "Validation error or email taken", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn update_profile(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user_id = parse_user_id(&auth_user)?;

    let service = AuthService::new(db);
    let user = service
        .update_profile(
            user_id,
            payload.first_name,
            payload.last_name,
            payload.email,
        )
        .await?;

    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "Profile updated successfully",
    ))
}

#[utoipa::path(
    get,
    path = "/api/auth",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "All users, newest first", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized", body = AppError),
        (status = 403, description = "Admin role required", body = AppError),
    ),
    tag = "auth"
)]
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = AuthService::new(db);
    let users = service.list_users().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(users))
}
