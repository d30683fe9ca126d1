//! Upload storage: streaming multipart fields to disk under a size cap.

use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use voicenotes_core::error::CoreError;
use voicenotes_core::upload::file_extension;

use crate::config::UploadConfig;
use crate::error::AppError;

/// Result of a successful store: where the file landed and how big it was.
#[derive(Debug)]
pub struct StoredFile {
    pub stored_filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Generate a collision-free on-disk name preserving the original extension.
pub fn generate_stored_filename(original_filename: &str) -> String {
    // `file_extension` includes the leading dot.
    match file_extension(original_filename) {
        Some(ext) => format!("{}{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

/// Stream a multipart field to disk in chunks, enforcing the configured
/// size cap.
///
/// The file is never buffered whole in memory. If the cap is exceeded or a
/// write fails, the partial file is removed before the error is returned.
pub async fn store_field(
    field: &mut Field<'_>,
    original_filename: &str,
    user_dir: &Path,
    config: &UploadConfig,
) -> Result<StoredFile, AppError> {
    tokio::fs::create_dir_all(user_dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload directory: {e}")))?;

    let stored_filename = generate_stored_filename(original_filename);
    let path = user_dir.join(&stored_filename);
    let max_bytes = config.max_upload_bytes();

    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create upload file: {e}")))?;

    let mut size_bytes: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                remove_partial(&path).await;
                return Err(AppError::BadRequest(format!("upload stream error: {e}")));
            }
        };

        size_bytes += chunk.len() as u64;
        if size_bytes > max_bytes {
            remove_partial(&path).await;
            return Err(AppError::Core(CoreError::Validation(format!(
                "File too large ({}MB). Maximum: {}MB",
                size_bytes / (1024 * 1024),
                config.max_upload_size_mb
            ))));
        }

        if let Err(e) = file.write_all(&chunk).await {
            remove_partial(&path).await;
            return Err(AppError::Internal(format!("failed to write upload: {e}")));
        }
    }

    if let Err(e) = file.flush().await {
        remove_partial(&path).await;
        return Err(AppError::Internal(format!("failed to flush upload: {e}")));
    }

    Ok(StoredFile {
        stored_filename,
        path,
        size_bytes,
    })
}

/// Best-effort removal of a stored file. Failures are logged, not surfaced;
/// the caller is already unwinding from a more interesting error.
pub async fn remove_stored_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove stored file");
    }
}

async fn remove_partial(path: &Path) {
    remove_stored_file(path).await;
}
