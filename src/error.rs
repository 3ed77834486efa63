use thiserror::Error;
use std::io;
use async_openai::error::OpenAIError;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, ReadmeError>;

/// Errors that can occur while generating, previewing or storing READMEs
#[derive(Debug, Error)]
pub enum ReadmeError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// OpenAI-compatible API errors
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// General message errors
    #[error("{0}")]
    Message(String),

    /// Network connectivity errors
    #[error("Network error: {0}")]
    Network(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// A requested file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API rate limit exceeded errors
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// GitHub API specific errors
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Text generation errors
    #[error("Generation error: {0}")]
    Generation(String),

    /// The repository yielded nothing worth documenting
    #[error("No analysable source files found in {0}")]
    NoSourceFiles(String),
}

impl ReadmeError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Checks if this error is transient and retryable
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) |
            Self::Http(_) |
            Self::RateLimitExceeded(_) |
            Self::IO(_)
        )
    }

    /// Checks if this error is fatal and should terminate processing
    pub fn is_fatal(&self) -> bool {
        !self.is_transient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ReadmeError::new("test error");
        assert!(matches!(error, ReadmeError::Message(_)));

        if let ReadmeError::Message(msg) = error {
            assert_eq!(msg, "test error");
        }
    }

    #[test]
    fn test_is_transient() {
        let transient = ReadmeError::RateLimitExceeded("resets at 1700000000".into());
        let fatal = ReadmeError::Validation("owner_name must not be empty".into());

        assert!(transient.is_transient());
        assert!(!fatal.is_transient());
        assert!(fatal.is_fatal());
    }

    #[test]
    fn test_no_source_files_message() {
        let error = ReadmeError::NoSourceFiles("octo/empty".into());
        assert_eq!(error.to_string(), "No analysable source files found in octo/empty");
    }
}
