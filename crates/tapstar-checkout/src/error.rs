//! Checkout Error Types

use std::time::Duration;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Checkout gateway errors. Every variant is terminal for the request that
/// produced it; nothing is retried automatically.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No response: connection refused, DNS failure, TLS failure
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout
    #[error("Gateway timed out after {0:?}")]
    Timeout(Duration),

    /// Gateway answered with a non-2xx status
    #[error("Gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body was not JSON, or `link` was missing or not a URL
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Whether re-initiating the purchase could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Network(_) | GatewayError::Timeout(_) => true,
            GatewayError::Http { status, .. } => *status == 429 || *status >= 500,
            GatewayError::MalformedResponse(_) | GatewayError::Config(_) => false,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            GatewayError::Network(_) => {
                "Could not reach the payment service. Check your connection."
            }
            GatewayError::Timeout(_) => "The payment service took too long to respond.",
            GatewayError::Http { .. } | GatewayError::MalformedResponse(_) => {
                "Checkout is unavailable right now. Please try again."
            }
            GatewayError::Config(_) => "Service configuration error.",
        }
    }

    pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout(timeout)
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(GatewayError::Timeout(Duration::from_secs(20)).is_retryable());
        assert!(GatewayError::Http { status: 503, body: String::new() }.is_retryable());
        assert!(!GatewayError::Http { status: 401, body: String::new() }.is_retryable());
        assert!(!GatewayError::MalformedResponse("no link".into()).is_retryable());
    }
}
