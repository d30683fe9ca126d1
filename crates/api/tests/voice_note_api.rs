//! HTTP-level integration tests for the voice-note endpoints: upload
//! validation and streaming, listing, ownership scoping, deletion, and the
//! transcription state machine.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_auth, post_multipart_auth, register_user,
    ScriptedEngine,
};
use sqlx::PgPool;

/// Upload a small valid file and return the created note's JSON.
async fn upload_note(app: axum::Router, token: &str, filename: &str) -> serde_json::Value {
    let response = post_multipart_auth(
        app,
        "/api/v1/voice-notes",
        filename,
        "audio/wav",
        b"RIFF fake wav bytes",
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// A valid upload returns 201 with status `uploaded` and the recorded size.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_user(app.clone(), "uploader@example.com", "Uploader").await;

    let json = upload_note(app, &token, "standup.wav").await;

    assert_eq!(json["data"]["original_filename"], "standup.wav");
    assert_eq!(json["data"]["status"], "uploaded");
    assert_eq!(json["data"]["file_size_bytes"], 19);
    assert_eq!(json["data"]["mime_type"], "audio/wav");
    // The on-disk name is a fresh UUID, not the client's name.
    let stored = json["data"]["stored_filename"].as_str().unwrap();
    assert!(stored.ends_with(".wav"));
    assert_ne!(stored, "standup.wav");
}

/// A disallowed extension is rejected before anything is stored.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_rejects_bad_extension(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = register_user(app.clone(), "exts@example.com", "Exts").await;

    let response = post_multipart_auth(
        app,
        "/api/v1/voice-notes",
        "malware.exe",
        "audio/wav",
        b"not audio",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains(".exe"));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM voice_notes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "no row may be created for a rejected upload");
}

/// A non-audio MIME type is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_rejects_bad_mime(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_user(app.clone(), "mime@example.com", "Mime").await;

    let response = post_multipart_auth(
        app,
        "/api/v1/voice-notes",
        "notes.mp3",
        "application/zip",
        b"zipzip",
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A file over the configured cap (1 MB in tests) is rejected mid-stream
/// and no row is created.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_rejects_oversize_file(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = register_user(app.clone(), "bigfile@example.com", "Big File").await;

    let oversized = vec![0u8; 1_200_000];
    let response = post_multipart_auth(
        app,
        "/api/v1/voice-notes",
        "long-recording.wav",
        "audio/wav",
        &oversized,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("File too large"));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM voice_notes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

/// A multipart request without a `file` field is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_without_file_field(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_user(app.clone(), "nofile@example.com", "No File").await;

    let boundary = "------------------------voicenotes-test";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
    );
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/voice-notes")
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(axum::body::Body::from(body))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file provided");
}

/// Uploads require authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_upload_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/voice-notes")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// List / detail / delete
// ---------------------------------------------------------------------------

/// Listing returns only the caller's notes, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_is_owner_scoped_and_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = register_user(app.clone(), "alice@example.com", "Alice").await;
    let bob = register_user(app.clone(), "bob@example.com", "Bob").await;

    upload_note(app.clone(), &alice, "first.wav").await;
    upload_note(app.clone(), &alice, "second.wav").await;
    upload_note(app.clone(), &bob, "bobs.wav").await;

    let response = get_auth(app, "/api/v1/voice-notes", &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let notes = json["data"].as_array().unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["original_filename"], "second.wav");
    assert_eq!(notes[1]["original_filename"], "first.wav");
}

/// Another user's note is a 404, indistinguishable from a missing one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_detail_cross_tenant_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = register_user(app.clone(), "alice2@example.com", "Alice").await;
    let bob = register_user(app.clone(), "bob2@example.com", "Bob").await;

    let json = upload_note(app.clone(), &alice, "private.wav").await;
    let id = json["data"]["id"].as_i64().unwrap();

    let own = get_auth(app.clone(), &format!("/api/v1/voice-notes/{id}"), &alice).await;
    assert_eq!(own.status(), StatusCode::OK);

    let other = get_auth(app.clone(), &format!("/api/v1/voice-notes/{id}"), &bob).await;
    assert_eq!(other.status(), StatusCode::NOT_FOUND);

    let missing = get_auth(app, "/api/v1/voice-notes/999999", &alice).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

/// Deleting a note removes it and everything hanging off it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_removes_note_and_transcript(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = register_user(app.clone(), "deleter@example.com", "Deleter").await;

    let json = upload_note(app.clone(), &token, "doomed.wav").await;
    let id = json["data"]["id"].as_i64().unwrap();

    // Transcribe so a transcript and segments exist for the cascade.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/voice-notes/{id}/transcribe"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(app.clone(), &format!("/api/v1/voice-notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &format!("/api/v1/voice-notes/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (transcripts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcripts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(transcripts, 0, "transcripts must be cascade-deleted");
    let (segments,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcript_segments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(segments, 0, "segments must be cascade-deleted");
}

// ---------------------------------------------------------------------------
// Transcription
// ---------------------------------------------------------------------------

/// Transcribing an uploaded note returns the transcript and completes the
/// note with the engine-reported duration.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_transcribe_success(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_user(app.clone(), "scribe@example.com", "Scribe").await;

    let json = upload_note(app.clone(), &token, "meeting.wav").await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/voice-notes/{id}/transcribe"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["full_text"],
        "Hello from the scripted engine. Second segment."
    );
    assert_eq!(json["data"]["language"], "en");
    assert_eq!(json["data"]["model_size"], "base");

    let response = get_auth(app, &format!("/api/v1/voice-notes/{id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["duration_seconds"], 9.0);
}

/// A completed note cannot be transcribed again.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_transcribe_completed_note_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_user(app.clone(), "twice@example.com", "Twice").await;

    let json = upload_note(app.clone(), &token, "done.wav").await;
    let id = json["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/voice-notes/{id}/transcribe");
    let first = post_auth(app.clone(), &uri, &token).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_auth(app, &uri, &token).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    let json = body_json(second).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Cannot transcribe note with status 'completed'"));
}

/// An engine failure marks the note `failed`, stores no transcript, and
/// leaves the note retryable.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_transcribe_failure_marks_failed_and_is_retryable(pool: PgPool) {
    let failing = common::build_test_app_with_engine(
        pool.clone(),
        Arc::new(ScriptedEngine::failing("model exploded")),
    );
    let token = register_user(failing.clone(), "retry@example.com", "Retry").await;

    let json = upload_note(failing.clone(), &token, "flaky.wav").await;
    let id = json["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/voice-notes/{id}/transcribe");

    let response = post_auth(failing.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    // Engine detail is not leaked to the client.
    assert_eq!(json["error"], "Transcription failed");

    let response = get_auth(failing, &format!("/api/v1/voice-notes/{id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "failed");

    let (transcripts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transcripts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(transcripts, 0, "a failed run must store no transcript");

    // A `failed` note may be retried; with a working engine it completes.
    let working = common::build_test_app(pool);
    let response = post_auth(working, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Transcription of someone else's note is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_transcribe_cross_tenant_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let alice = register_user(app.clone(), "alice3@example.com", "Alice").await;
    let bob = register_user(app.clone(), "bob3@example.com", "Bob").await;

    let json = upload_note(app.clone(), &alice, "hers.wav").await;
    let id = json["data"]["id"].as_i64().unwrap();

    let response = post_auth(app, &format!("/api/v1/voice-notes/{id}/transcribe"), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
