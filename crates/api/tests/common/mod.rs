//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` assembles the production router over a per-test database
//! pool and a scripted speech-to-text engine, so tests exercise the full
//! middleware stack without a real whisper model.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use voicenotes_api::auth::jwt::JwtConfig;
use voicenotes_api::config::{ServerConfig, UploadConfig, WhisperSettings};
use voicenotes_api::router::build_app_router;
use voicenotes_api::state::AppState;
use voicenotes_whisper::{
    EngineError, SpeechToText, TranscribedSegment, TranscriptionOutput,
};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uploads land in a unique directory under the system temp dir; the size
/// cap is 1 MB so oversize behaviour is cheap to exercise.
pub fn test_config() -> ServerConfig {
    let upload_dir =
        std::env::temp_dir().join(format!("voicenotes-test-{}", uuid::Uuid::new_v4()));

    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-key".to_string(),
            expire_minutes: 480,
        },
        upload: UploadConfig {
            upload_dir,
            max_upload_size_mb: 1,
        },
        whisper: WhisperSettings {
            model_path: PathBuf::from("/nonexistent/ggml-base.bin"),
            model_size: "base".to_string(),
        },
    }
}

/// A scripted [`SpeechToText`] implementation for tests.
pub struct ScriptedEngine {
    result: Result<TranscriptionOutput, String>,
}

impl ScriptedEngine {
    /// Engine that always succeeds with two fixed segments.
    pub fn succeeding() -> Self {
        Self {
            result: Ok(TranscriptionOutput {
                segments: vec![
                    TranscribedSegment {
                        start_time: 0.0,
                        end_time: 4.2,
                        text: "Hello from the scripted engine.".to_string(),
                    },
                    TranscribedSegment {
                        start_time: 4.2,
                        end_time: 9.0,
                        text: "Second segment.".to_string(),
                    },
                ],
                language: Some("en".to_string()),
                duration_seconds: Some(9.0),
            }),
        }
    }

    /// Engine that always fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl SpeechToText for ScriptedEngine {
    async fn transcribe(&self, _audio_path: &Path) -> Result<TranscriptionOutput, EngineError> {
        match &self.result {
            Ok(output) => Ok(output.clone()),
            Err(msg) => Err(EngineError::Inference(msg.clone())),
        }
    }
}

/// Build the full application router with a succeeding scripted engine.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_engine(pool, Arc::new(ScriptedEngine::succeeding()))
}

/// Build the full application router with the given engine, mirroring the
/// router construction in `main.rs`.
pub fn build_test_app_with_engine(pool: PgPool, engine: Arc<dyn SpeechToText>) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), engine);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Upload a file via multipart as the `file` form field.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    token: &str,
) -> Response<Body> {
    let boundary = "------------------------voicenotes-test";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be valid JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body should be valid UTF-8")
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register a user through the API and return their session token.
pub async fn register_user(app: Router, email: &str, display_name: &str) -> String {
    let body = serde_json::json!({
        "email": email,
        "password": "test_password_123!",
        "display_name": display_name,
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("register response must contain a token")
        .to_string()
}
