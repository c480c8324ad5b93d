//! Error types for the portal proxy Lambda functions.

use thiserror::Error;

use crate::models::ErrorBody;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a proxy request.
///
/// Every variant is terminal for the request; nothing here is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Third-party API call failed or answered with an error status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Outbound HTTP failure that is not attributable to the upstream.
    /// Never carries the request URL, which may embed a credential.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.without_url())
    }
}

impl Error {
    /// Classify a failed send or body read against an upstream.
    ///
    /// Timeouts become the proxy's upstream error; anything else is internal.
    pub fn from_transport(e: reqwest::Error, timeout_status: u16, message: &str) -> Self {
        if e.is_timeout() {
            Error::upstream(timeout_status, message)
        } else {
            Error::from(e)
        }
    }

    /// Build an upstream error carrying the status the caller should see.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Upstream { status, .. } => *status,
            Error::Http(_) | Error::Serialization(_) | Error::Internal(_) => 500,
        }
    }

    /// Whether this error belongs to the internal (500) category.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::Serialization(_) | Error::Internal(_)
        )
    }

    /// Render the JSON body returned to the caller.
    ///
    /// Validation and upstream failures carry only `error`; internal failures
    /// add `details` with the underlying message.
    pub fn body(&self) -> ErrorBody {
        match self {
            Error::Validation(message) | Error::Upstream { message, .. } => ErrorBody {
                error: message.clone(),
                details: None,
            },
            Error::Http(e) => ErrorBody::internal(e.to_string()),
            Error::Serialization(e) => ErrorBody::internal(e.to_string()),
            Error::Internal(message) => ErrorBody::internal(message.clone()),
        }
    }
}
