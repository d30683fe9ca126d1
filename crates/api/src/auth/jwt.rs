//! JWT session-token generation and validation.
//!
//! Tokens are HS256-signed and carry the user's identity ([`Claims`]).
//! Every verification failure -- bad signature, malformed payload, expired --
//! is treated uniformly as "invalid"; callers get no partial trust.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use voicenotes_core::types::DbId;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's email at issuance time.
    pub email: String,
    /// The user's display name at issuance time.
    pub display_name: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in minutes (default: 480, matching the 8-hour
    /// session cookie).
    pub expire_minutes: i64,
}

/// Default token expiry in minutes (8 hours).
const DEFAULT_EXPIRE_MINUTES: i64 = 480;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var              | Required | Default |
    /// |----------------------|----------|---------|
    /// | `JWT_SECRET`         | **yes**  | --      |
    /// | `JWT_EXPIRE_MINUTES` | no       | `480`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expire_minutes: i64 = std::env::var("JWT_EXPIRE_MINUTES")
            .unwrap_or_else(|_| DEFAULT_EXPIRE_MINUTES.to_string())
            .parse()
            .expect("JWT_EXPIRE_MINUTES must be a valid i64");

        Self {
            secret,
            expire_minutes,
        }
    }
}

/// Generate an HS256 session token for the given user.
pub fn create_token(
    user_id: DbId,
    email: &str,
    display_name: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        display_name: display_name.to_string(),
        exp: now + config.expire_minutes * 60,
        iat: now,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Signature, expiration, and payload shape are all checked; any failure
/// yields an error with no distinction exposed to the caller.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
