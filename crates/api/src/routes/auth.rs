//! Authentication route table.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes (nested under `/api/v1/auth`):
/// - `POST /register` -- create an account, returns a session token
/// - `POST /login` -- exchange credentials for a session token
/// - `GET  /verify` -- validate the caller's token, returns the user
/// - `POST /logout` -- clear the session cookie
/// - `POST /forgot-password` -- request a reset token
/// - `POST /reset-password` -- consume a reset token, set a new password
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify))
        .route("/logout", post(auth::logout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}
