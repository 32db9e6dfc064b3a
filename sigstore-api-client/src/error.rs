//! Error types for the API client.
//!
//! [`ClientError`] is returned by request operations, [`ClientBuildError`]
//! by client construction.

use std::time::Duration;

/// Errors returned while sending a request.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error (connection refused, DNS failure, reset, etc.).
    #[error("transport error: {0}")]
    Transport(String),

    /// The client timeout elapsed before the exchange finished.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be built from the given path or headers.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),
}

impl ClientError {
    /// Returns true if the client timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    /// Returns true if the underlying transport failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Errors returned while building a client.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ClientBuildError {
    /// The base URL is not an absolute `http` or `https` URL.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The configured user agent is not a valid header value.
    #[error("invalid user agent {0:?}")]
    InvalidUserAgent(String),

    /// The default TLS configuration could not be created.
    #[error("failed to configure TLS: {0}")]
    Tls(String),
}

impl From<hyper::Error> for ClientError {
    fn from(err: hyper::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<hyper_util::client::legacy::Error> for ClientError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        ClientError::Transport(format!("request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_predicates() {
        assert!(ClientError::Timeout(Duration::from_secs(1)).is_timeout());
        assert!(!ClientError::Timeout(Duration::from_secs(1)).is_transport());
        assert!(ClientError::Transport("connection reset".into()).is_transport());
        assert!(!ClientError::Encode("bad".into()).is_timeout());
    }

    #[test]
    fn test_error_messages() {
        let err = ClientError::Timeout(Duration::from_secs(7));
        assert_eq!(err.to_string(), "request timed out after 7s");

        let err = ClientBuildError::InvalidBaseUrl {
            url: "nope".into(),
            reason: "missing scheme".into(),
        };
        assert_eq!(err.to_string(), "invalid base URL \"nope\": missing scheme");
    }
}
