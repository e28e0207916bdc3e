use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Unsupported request: {hint}")]
    UnsupportedOperation { hint: String },

    #[error("Could not resolve '{term}' in {scope}")]
    InvalidInput { term: String, scope: String },

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, TranslateError>;
