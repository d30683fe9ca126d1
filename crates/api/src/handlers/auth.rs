//! Authentication handlers: register, login, verify, logout, and the
//! password-reset pair.
//!
//! Login failures are deliberately uniform: unknown email, wrong password,
//! and deactivated account all produce the same 401 message so the endpoint
//! cannot be used to probe which accounts exist.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use voicenotes_core::error::CoreError;
use voicenotes_db::models::user::{CreateUser, User};
use voicenotes_db::repositories::UserRepo;

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{ApiResult, AppError};
use crate::middleware::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Reset tokens are valid for 30 minutes.
const RESET_TOKEN_EXPIRY_MINS: i64 = 30;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";
const EXPIRED_RESET_TOKEN: &str = "Reset token has expired";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Token plus public user fields, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(CoreError::Validation("A valid email is required".into()).into());
    }

    let display_name = payload.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(CoreError::Validation("Display name is required".into()).into());
    }

    validate_password_strength(&payload.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    // Duplicate emails surface via the unique index and map to a 400.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email,
            password_hash,
            display_name,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "user registered");

    let token = issue_token(&state, &user)?;
    Ok(auth_response(StatusCode::CREATED, token, user))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let user = UserRepo::find_by_email(&state.pool, payload.email.trim())
        .await?
        .ok_or_else(|| invalid_credentials())?;

    let verified = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("password verification failed: {e}")))?;
    if !verified || !user.is_active {
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "user logged in");

    let token = issue_token(&state, &user)?;
    Ok(auth_response(StatusCode::OK, token, user))
}

/// GET /api/v1/auth/verify
///
/// Confirms the caller's token and returns the current user record. A user
/// deactivated after token issuance is rejected here.
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

    Ok(Json(DataResponse::new(user)))
}

/// POST /api/v1/auth/logout
///
/// Stateless tokens cannot be revoked server-side; this clears the browser
/// session cookie.
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(MessageResponse::new("Logged out")),
    )
        .into_response()
}

/// POST /api/v1/auth/forgot-password
///
/// Always answers with the same message, whether or not the email matches an
/// account. The reset link is currently delivered via the server log.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    if let Some(user) = UserRepo::find_by_email(&state.pool, payload.email.trim()).await? {
        if user.is_active {
            let token = Uuid::new_v4().to_string();
            let expires_at =
                chrono::Utc::now() + chrono::Duration::minutes(RESET_TOKEN_EXPIRY_MINS);
            UserRepo::set_reset_token(&state.pool, user.id, &token, expires_at).await?;

            tracing::info!(
                user_id = user.id,
                reset_token = %token,
                "password reset requested"
            );
        }
    }

    Ok(Json(MessageResponse::new(
        "If the email exists, a password reset link has been sent",
    )))
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    validate_password_strength(&payload.new_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let user = UserRepo::find_by_reset_token(&state.pool, &payload.token)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation(INVALID_RESET_TOKEN.into())))?;

    let expired = match user.password_reset_expires_at {
        Some(expires_at) => expires_at < chrono::Utc::now(),
        None => true,
    };
    if expired {
        // Single use: an expired token is cleared on first presentation.
        UserRepo::clear_reset_token(&state.pool, user.id).await?;
        return Err(CoreError::Validation(EXPIRED_RESET_TOKEN.into()).into());
    }

    let password_hash = hash_password(&payload.new_password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
    UserRepo::complete_password_reset(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "password reset completed");

    Ok(Json(MessageResponse::new(
        "Password has been reset successfully",
    )))
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    create_token(user.id, &user.email, &user.display_name, &state.config.jwt)
        .map_err(|e| AppError::Internal(format!("token generation failed: {e}")))
}

/// Token in the body for API clients, cookie for browsers.
fn auth_response(status: StatusCode, token: String, user: User) -> Response {
    let cookie = session_cookie(&token);
    (
        status,
        [(header::SET_COOKIE, cookie)],
        Json(DataResponse::new(AuthResponse { token, user })),
    )
        .into_response()
}
