use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("local store error: {0}")]
    Storage(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
