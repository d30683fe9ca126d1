//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use voicenotes_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// The password hash and reset-token fields never leave the server; they are
/// skipped during serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new user at registration.
#[derive(Debug)]
pub struct CreateUser {
    /// Already normalized (lowercased, trimmed) by the caller.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub display_name: String,
}
