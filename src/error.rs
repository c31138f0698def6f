use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubStarsError {
    #[error("Invalid repository name: {0}")]
    InvalidRepository(String),

    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimitExceeded { reset_at: DateTime<Utc> },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Environment error: {0}")]
    EnvError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl GitHubStarsError {
    /// True for errors caused by bad user input rather than by the API or I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(self, GitHubStarsError::InvalidRepository(_))
    }
}

pub type Result<T> = std::result::Result<T, GitHubStarsError>;
