//! Shared application state.

use std::sync::Arc;

use voicenotes_db::DbPool;
use voicenotes_whisper::SpeechToText;

use crate::config::ServerConfig;

/// State shared by every handler. Cheap to clone; the pool and engine are
/// internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub engine: Arc<dyn SpeechToText>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ServerConfig, engine: Arc<dyn SpeechToText>) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            engine,
        }
    }
}
