//! Error types for the tripsync provider clients.

use reqwest::StatusCode;

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while calling an external provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level error from reqwest (connect, timeout, TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-2xx status.
    #[error("provider returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Provider is throttling us (HTTP 429).
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// Provider account is out of credit (HTTP 402).
    #[error("payment required: {0}")]
    PaymentRequired(String),

    /// Body could not be decoded into the expected schema.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Client is not configured correctly.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

impl ProviderError {
    /// Returns the error message.
    pub fn message(&self) -> String {
        match self {
            ProviderError::Http(e) => e.to_string(),
            ProviderError::Status { message, .. } => message.clone(),
            ProviderError::RateLimited(msg) => msg.clone(),
            ProviderError::PaymentRequired(msg) => msg.clone(),
            ProviderError::Malformed(msg) => msg.clone(),
            ProviderError::Config(msg) => msg.clone(),
        }
    }

    /// Returns the HTTP status if the provider answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            ProviderError::PaymentRequired(_) => Some(StatusCode::PAYMENT_REQUIRED),
            ProviderError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Returns true if another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http(e) => e.is_timeout() || e.is_connect(),
            ProviderError::Status { status, .. } => status.is_server_error(),
            ProviderError::RateLimited(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ProviderError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "AI gateway error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "provider returned 500 Internal Server Error: AI gateway error"
        );
        assert_eq!(err.message(), "AI gateway error");
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        let err = ProviderError::RateLimited("slow down".to_string());
        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn test_payment_required_not_retryable() {
        let err = ProviderError::PaymentRequired("add credits".to_string());
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(StatusCode::PAYMENT_REQUIRED));
    }

    #[test]
    fn test_client_error_status_not_retryable() {
        let err = ProviderError::Status {
            status: StatusCode::BAD_REQUEST,
            message: "missing city".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_malformed_from_serde() {
        let err: ProviderError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, ProviderError::Malformed(_)));
        assert!(err.status().is_none());
    }
}
