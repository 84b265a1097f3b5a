//! Error types for the chat client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    #[error("authentication rejected by the API (status {status})")]
    Auth { status: u16 },

    #[error("rate limited by the API")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}
