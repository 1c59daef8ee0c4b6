//! Adapter error types.

use thiserror::Error;

/// Errors surfaced by the HTTP client adapter.
///
/// Failures of the wrapped library are carried as-is in [`HttpError::Reqwest`]
/// and [`HttpError::Io`].
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Invalid proxy URL {url}: {reason}")]
    InvalidProxy { url: String, reason: String },

    #[error("Too many follow-up requests to {url}: {follow_ups}")]
    TooManyFollowUps { url: String, follow_ups: usize },
}

impl HttpError {
    pub(crate) fn invalid_header(name: &str, reason: impl ToString) -> Self {
        HttpError::InvalidHeader {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
