use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`; transcription of a
    /// long recording is slow on CPU).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Upload storage configuration.
    pub upload: UploadConfig,
    /// Whisper model configuration.
    pub whisper: WhisperSettings,
}

/// Where uploads land and how large they may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root directory for stored audio; each user gets a subdirectory.
    pub upload_dir: PathBuf,
    /// Per-file size cap in megabytes.
    pub max_upload_size_mb: u64,
}

impl UploadConfig {
    /// Per-file size cap in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Directory holding a given user's files.
    pub fn user_dir(&self, user_id: voicenotes_core::types::DbId) -> PathBuf {
        self.upload_dir.join(user_id.to_string())
    }
}

/// Which whisper model to run.
#[derive(Debug, Clone)]
pub struct WhisperSettings {
    /// Path to the ggml model file.
    pub model_path: PathBuf,
    /// Model size label recorded on each transcript (e.g. `"base"`).
    pub model_size: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                      |
    /// | `UPLOAD_DIR`           | `uploads`                  |
    /// | `MAX_UPLOAD_SIZE_MB`   | `100`                      |
    /// | `WHISPER_MODEL_PATH`   | `models/ggml-base.bin`     |
    /// | `WHISPER_MODEL_SIZE`   | `base`                     |
    ///
    /// JWT settings are loaded by [`JwtConfig::from_env`]; `JWT_SECRET` is
    /// mandatory.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_size_mb: u64 = std::env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("MAX_UPLOAD_SIZE_MB must be a valid u64");

        let model_path = PathBuf::from(
            std::env::var("WHISPER_MODEL_PATH").unwrap_or_else(|_| "models/ggml-base.bin".into()),
        );
        let model_size =
            std::env::var("WHISPER_MODEL_SIZE").unwrap_or_else(|_| "base".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            upload: UploadConfig {
                upload_dir,
                max_upload_size_mb,
            },
            whisper: WhisperSettings {
                model_path,
                model_size,
            },
        }
    }
}
