//! Error handling for ffcookies

use thiserror::Error;

/// Main error type for ffcookies operations
#[derive(Error, Debug)]
pub enum FfCookiesError {
    /// Nothing to read from: no store driver registered, or the profile
    /// directory cannot be determined.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Open or query failure reported by the cookie store, unmodified.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Store task failed: {0}")]
    Task(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ffcookies operations
pub type Result<T> = std::result::Result<T, FfCookiesError>;

/// Process exit code used by the command line tool for each error kind.
pub fn exit_code_for_error(err: &FfCookiesError) -> i32 {
    match err {
        FfCookiesError::Config(_) => 2,
        FfCookiesError::InvalidUrl(_) => 3,
        FfCookiesError::Io(_) => 23,
        FfCookiesError::Json(_) => 26,
        FfCookiesError::Cancelled => 28,
        FfCookiesError::Store(_) => 43,
        FfCookiesError::Task(_) => 1,
    }
}
