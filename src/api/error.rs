//! Error taxonomy for the server API boundary.

use thiserror::Error;

/// Failure classes for server interactions.
///
/// Callers branch on the class: transport failures flip the connection
/// indicator, application failures become notices, validation failures
/// never leave the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, timeout, TLS.
    #[error("server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but reported failure.
    #[error("{0}")]
    Application(String),

    /// The payload failed client-side validation before any request.
    #[error("invalid configuration: {0}")]
    Validation(String),

    /// The server answered with a body that does not match the contract.
    #[error("malformed server response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
