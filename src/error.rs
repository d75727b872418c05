use thiserror::Error;

pub type Result<T> = std::result::Result<T, TgFetchError>;

#[derive(Debug, Error)]
pub enum TgFetchError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {0}: {1}")]
    InvalidEnv(&'static str, String),

    #[error("Not a channel")]
    NotAChannel,

    #[error("no channel found for username {0}")]
    UnresolvedUsername(String),

    #[error("{0}")]
    Telegram(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl TgFetchError {
    /// Wrap any error coming out of the Telegram client layer.
    ///
    /// The grammers error types live in several sub-crates; all we ever do
    /// with them is report their message inside the JSON envelope.
    pub fn telegram(e: impl std::fmt::Display) -> Self {
        TgFetchError::Telegram(e.to_string())
    }
}
