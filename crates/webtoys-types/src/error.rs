use thiserror::Error;

/// A string that does not have the `+1999` + 7 digits shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("malformed synthetic identifier: '{0}'")]
    Malformed(String),
}

/// Failures of the one-shot webhook dispatch. Terminal for the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The webhook endpoint answered 404.
    #[error("SMS bot not found")]
    NotFound,

    /// Timeout, refused connection, DNS failure and other transport errors.
    #[error("error sending request: {0}")]
    Transport(String),

    /// Non-success status other than 404; only produced in strict mode.
    #[error("webhook rejected request with HTTP {status}")]
    Rejected { status: u16 },
}

/// Failures of a single content-store query. Swallowed by the poller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store returned HTTP {status}")]
    Status { status: u16 },

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("failed to decode store response: {0}")]
    Decode(String),

    /// The query was still running when the poll window closed.
    #[error("store query did not finish before the poll deadline")]
    DeadlineExceeded,
}

/// Errors that end a build invocation with `success: false`.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("too many builds in flight")]
    Busy,

    #[error("build request cancelled")]
    Cancelled,

    #[error("{0}")]
    Unclassified(String),
}

/// Invalid relay configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
