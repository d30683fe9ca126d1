//! Session cookie construction and parsing.
//!
//! Browser sessions carry the same JWT as API clients, in an `HttpOnly`
//! `SameSite=Lax` cookie with a fixed name and an 8-hour lifetime.

/// Fixed session cookie name.
pub const AUTH_COOKIE_NAME: &str = "vn_auth_token";

/// Session cookie lifetime in seconds (8 hours).
pub const COOKIE_MAX_AGE_SECS: u64 = 8 * 60 * 60;

/// Build the `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!(
        "{AUTH_COOKIE_NAME}={token}; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax"
    )
}

/// Build the `Set-Cookie` value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{AUTH_COOKIE_NAME}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax")
}

/// Extract the session token from a `Cookie` request header value, if
/// present.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == AUTH_COOKIE_NAME).then_some(value)
    })
}
