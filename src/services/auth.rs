use crate::{
    error::{AppError, AppResult},
    models::{user, verification_token, User, UserModel, VerificationToken},
    services::email::EmailService,
    utils::encode_session_token,
    utils::{hash_password, verify_password},
};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new user and send the verification code.
    ///
    /// An existing unverified account with the same email is purged first,
    /// so a registration that never completed can always be redone. A
    /// verified account blocks re-registration. No session token is issued
    /// until the email is verified.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        email_service: &EmailService,
    ) -> AppResult<UserModel> {
        let email = email.trim().to_lowercase();

        if let Some(existing) = self.find_by_email(&email).await? {
            if existing.is_verified {
                return Err(AppError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
            // Stale unverified registration: delete it (tokens and habits
            // go with it via FK cascade) and start over.
            User::delete_by_id(existing.id).exec(&self.db).await?;
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            first_name: ActiveValue::Set(first_name.trim().to_string()),
            last_name: ActiveValue::Set(last_name.trim().to_string()),
            email: ActiveValue::Set(email),
            password_hash: ActiveValue::Set(password_hash),
            role: ActiveValue::Set("user".to_string()),
            is_verified: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        let user = new_user.insert(&self.db).await?;
        let code = self.issue_verification_token(user.id).await?;

        // Send verification email (non-fatal)
        if let Err(e) = email_service
            .send_verification_email(&user.email, &user.first_name, &code)
            .await
        {
            tracing::warn!("Failed to send verification email: {e}");
        }

        Ok(user)
    }

    /// Login with email and password.
    /// Returns (user_model, session_token).
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(UserModel, String)> {
        let email = email.trim().to_lowercase();

        let user = self
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let is_valid = verify_password(password, &user.password_hash)?;
        if !is_valid {
            return Err(AppError::Unauthorized);
        }

        if !user.is_verified {
            return Err(AppError::Unverified);
        }

        let token = encode_session_token(&user.id.to_string())?;
        Ok((user, token))
    }

    /// Redeem a 6-digit verification code.
    ///
    /// The code row is deleted before the user flips to verified, so a
    /// second redemption of the same code always fails. Returns the
    /// verified user and a fresh session token (auto-login).
    pub async fn verify_email(&self, code: &str) -> AppResult<(UserModel, String)> {
        let now = chrono::Utc::now().naive_utc();

        let record = VerificationToken::find()
            .filter(verification_token::Column::Token.eq(code.trim()))
            .filter(verification_token::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::Validation("Invalid or expired verification token".to_string())
            })?;

        let user = self.get_user_by_id(record.user_id).await?;

        VerificationToken::delete_by_id(record.id)
            .exec(&self.db)
            .await?;

        let mut active: user::ActiveModel = user.into();
        active.is_verified = ActiveValue::Set(true);
        active.updated_at = ActiveValue::Set(now);
        let user = active.update(&self.db).await?;

        let token = encode_session_token(&user.id.to_string())?;
        Ok((user, token))
    }

    /// Issue a fresh verification code and re-send it. Earlier codes stay
    /// valid until they expire.
    pub async fn resend_verification(
        &self,
        email: &str,
        email_service: &EmailService,
    ) -> AppResult<()> {
        let email = email.trim().to_lowercase();

        let user = self
            .find_by_email(&email)
            .await?
            .ok_or(AppError::NotFound)?;

        if user.is_verified {
            return Err(AppError::Validation(
                "Email is already verified".to_string(),
            ));
        }

        let code = self.issue_verification_token(user.id).await?;

        if let Err(e) = email_service
            .send_verification_email(&user.email, &user.first_name, &code)
            .await
        {
            tracing::warn!("Failed to send verification email: {e}");
        }

        Ok(())
    }

    /// Partial profile update (name and email only).
    pub async fn update_profile(
        &self,
        user_id: i32,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> AppResult<UserModel> {
        let user = self.get_user_by_id(user_id).await?;
        let now = chrono::Utc::now().naive_utc();

        let new_email = match email {
            Some(e) => {
                let e = e.trim().to_lowercase();
                let taken = User::find()
                    .filter(user::Column::Email.eq(e.clone()))
                    .filter(user::Column::Id.ne(user_id))
                    .one(&self.db)
                    .await?
                    .is_some();
                if taken {
                    return Err(AppError::Conflict(
                        "Email is already taken by another user".to_string(),
                    ));
                }
                Some(e)
            }
            None => None,
        };

        let mut active: user::ActiveModel = user.into();
        if let Some(f) = first_name {
            active.first_name = ActiveValue::Set(f.trim().to_string());
        }
        if let Some(l) = last_name {
            active.last_name = ActiveValue::Set(l.trim().to_string());
        }
        if let Some(e) = new_email {
            active.email = ActiveValue::Set(e);
        }
        active.updated_at = ActiveValue::Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, id: i32) -> AppResult<UserModel> {
        let user = User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(user)
    }

    /// List all users, newest first (admin only, checked by the caller).
    pub async fn list_users(&self) -> AppResult<Vec<UserModel>> {
        let users = User::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserModel>> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user)
    }

    /// Create a 6-digit verification code valid for 24 hours and return it.
    async fn issue_verification_token(&self, user_id: i32) -> AppResult<String> {
        let code = generate_code();
        let now = chrono::Utc::now().naive_utc();

        let record = verification_token::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            token: ActiveValue::Set(code),
            expires_at: ActiveValue::Set(now + chrono::Duration::hours(24)),
            created_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let record = record.insert(&self.db).await?;
        Ok(record.token)
    }
}

/// Random 6-digit numeric code, never with a leading zero.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code()).collect();
        assert!(codes.len() > 1);
    }
}
