//! FILENAME: core/persistence/src/error.rs

use projection_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Projection failed: {0}")]
    Engine(EngineError),
}

impl From<EngineError> for PersistenceError {
    fn from(err: EngineError) -> Self {
        match err {
            // a failing sink is a failing file or stream
            EngineError::Sink(io) => PersistenceError::Io(io),
            other => PersistenceError::Engine(other),
        }
    }
}
