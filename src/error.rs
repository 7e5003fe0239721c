use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepasoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, RepasoError>;
