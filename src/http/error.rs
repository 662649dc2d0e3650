//! Request outcome errors.

use thiserror::Error;

/// Everything that can go wrong with an API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The network stage did not settle within the budget.
    #[error("request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// Transport-level failure (connect, reset, DNS).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response other than 401.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The backend rejected the credential. Never retried.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The response body was not the JSON we expected.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    #[error("endpoint '{endpoint}' needs a value for ':{name}'")]
    MissingParameter { endpoint: String, name: String },

    #[error("endpoint '{endpoint}' cannot use '{value}' for ':{name}'")]
    InvalidParameter {
        endpoint: String,
        name: String,
        value: String,
    },

    #[error("{method} requests need a body")]
    MissingBody { method: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout { .. }
                | ApiError::Network(_)
                | ApiError::Http { .. }
                | ApiError::Decode(_)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::AuthenticationFailed => Some(401),
            _ => None,
        }
    }

    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Timeout { .. } => "timeout",
            ApiError::Network(_) => "network",
            ApiError::Http { .. } => "http",
            ApiError::AuthenticationFailed => "auth",
            ApiError::Decode(_) => "decode",
            ApiError::UnknownEndpoint(_)
            | ApiError::MissingParameter { .. }
            | ApiError::InvalidParameter { .. }
            | ApiError::MissingBody { .. }
            | ApiError::InvalidUrl(_) => "invalid_request",
            ApiError::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout { after_ms: 0 }
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

/// Pick the message for a failed response: the body's `message` field when
/// it is readable JSON, else a generic one.
pub fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("request failed: {}", status))
}
