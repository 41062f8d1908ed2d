//! Backend client error types.

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Backend returned a non-2xx status.
    #[error("backend {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body did not match the expected shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// A write that should echo the row returned nothing.
    #[error("{endpoint} returned no rows")]
    EmptyResponse { endpoint: String },
    /// An exact-count query returned no usable `Content-Range` header.
    #[error("{endpoint} returned no row count")]
    MissingCount { endpoint: String },
    /// Sign-in was refused (bad credentials, unconfirmed email).
    #[error("sign-in rejected: {message}")]
    AuthRejected { message: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl BackendError {
    /// HTTP status returned by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
