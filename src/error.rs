use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlidecvError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Indexing error: {0}")]
    Indexing(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlidecvError>;
