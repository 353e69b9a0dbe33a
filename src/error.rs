use thiserror::Error;

pub type RelishResult<T> = Result<T, RelishError>;

#[derive(Error, Debug)]
pub enum RelishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Completion provider error: {0}")]
    Provider(#[from] crate::ai::ProviderError),
}
