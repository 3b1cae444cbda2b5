use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuptureError {
    #[error("Schema error: missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Spec error: {0}")]
    Spec(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(String),
}

impl From<polars::error::PolarsError> for RuptureError {
    fn from(err: polars::error::PolarsError) -> Self {
        RuptureError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RuptureError>;
