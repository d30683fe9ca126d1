//! Authenticated-user extractor.
//!
//! Handlers that take an [`AuthUser`] argument only run for requests carrying
//! a valid session token. The token is looked up in two places, in order:
//!
//! 1. `Authorization: Bearer <token>` header (API clients)
//! 2. the session cookie (browser clients)
//!
//! Missing and invalid tokens both produce a 401; the two cases get distinct
//! messages but the same status.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use voicenotes_core::error::CoreError;
use voicenotes_core::types::DbId;

use crate::auth::cookie::token_from_cookie_header;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Identity of the authenticated caller, decoded from the session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub display_name: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Not authenticated".to_string()))
        })?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            display_name: claims.display_name,
        })
    }
}

/// Pull the session token out of the request, preferring the
/// `Authorization` header over the cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION) {
        if let Ok(value) = value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    parts
        .headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookie_header)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let parts = parts_with_headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "vn_auth_token=cookie-token"),
        ]);
        assert_eq!(extract_token(&parts).as_deref(), Some("header-token"));
    }

    #[test]
    fn test_cookie_fallback() {
        let parts = parts_with_headers(&[("cookie", "vn_auth_token=cookie-token")]);
        assert_eq!(extract_token(&parts).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_no_credentials() {
        let parts = parts_with_headers(&[]);
        assert_eq!(extract_token(&parts), None);
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let parts = parts_with_headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&parts), None);
    }
}
