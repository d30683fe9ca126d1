//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed session-token generation and validation.
//! - [`cookie`] -- session cookie construction and parsing.

pub mod cookie;
pub mod jwt;
pub mod password;
