use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("buffer capacity must be greater than zero")]
    InvalidCapacity,
    #[error("invalid detector config: {0}")]
    InvalidConfig(&'static str),
    #[error("tracking source failed: {0}")]
    Source(String),
    #[error("recorder I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize session summary: {0}")]
    Json(#[from] serde_json::Error),
}
