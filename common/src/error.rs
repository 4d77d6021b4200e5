use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data loading error: {0}")]
    DataLoadError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
