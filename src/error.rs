use thiserror::Error;

/// Main error type for wikiwrapper
#[derive(Error, Debug)]
pub enum WikiError {
    /// Game code not present in the registry, or resource not offered for it
    #[error("game not supported: {0}")]
    UnsupportedGame(String),

    /// Protagonist missing, unexpected, or unknown for the requested game
    #[error("{0}")]
    InvalidProtagonist(String),

    /// Caller-supplied continuation token that cannot be used as an offset
    #[error("invalid continue key: {0}")]
    InvalidContinueKey(String),

    /// Transport failure, non-success HTTP status, or an API error object
    #[error("wiki query failed: {0}")]
    UpstreamQuery(String),

    /// A required structural field is absent or has the wrong shape
    #[error("malformed wiki response: {0}")]
    MalformedResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WikiError {
    /// True for errors caused by the request itself rather than by the wiki.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WikiError::UnsupportedGame(_)
                | WikiError::InvalidProtagonist(_)
                | WikiError::InvalidContinueKey(_)
        )
    }
}

impl From<reqwest::Error> for WikiError {
    fn from(err: reqwest::Error) -> Self {
        WikiError::UpstreamQuery(err.to_string())
    }
}

/// Convenient Result type using WikiError
pub type Result<T> = std::result::Result<T, WikiError>;
