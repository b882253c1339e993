//! Error types for the two upstream HTTP APIs (news search and chat completion).
//!
//! Neither kind of error ever reaches the user as-is: fetch errors are logged
//! and the failing category is skipped, completion errors are logged and
//! replaced with a fixed message. The variants exist so those logs say what
//! actually went wrong.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Timeout, DNS failure, refused connection, TLS problems.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("authentication rejected by upstream API")]
    Unauthorized,

    #[error("rate limited by upstream API")]
    RateLimited,

    /// The API answered 2xx but reported an error in its body.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("completion contained no text")]
    EmptyCompletion,
}

impl ApiError {
    /// Map a non-success status and its body onto the taxonomy.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
            _ => ApiError::Status { status, body },
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies_auth_and_rate_limits() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, String::new()),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ApiError::RateLimited
        ));
    }

    #[test]
    fn test_from_status_keeps_other_statuses_with_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into());
        assert_eq!(err.to_string(), "unexpected status 500 Internal Server Error: boom");
    }
}
