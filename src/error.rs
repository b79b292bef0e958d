//! Error types for the network map controller
//!
//! Every failure the controller can see comes from the backend API or from
//! configuration. Load failures are recovered locally by the controller;
//! these types only carry enough detail to log and notify.

use thiserror::Error;

/// Result type alias for network map operations
pub type Result<T> = std::result::Result<T, NetMapError>;

/// Error types for network map operations
#[derive(Error, Debug)]
pub enum NetMapError {
    /// Transport-level HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Endpoint {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// Response body was not the JSON we expected
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection errors (unreachable backend, bad URL)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NetMapError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a non-success status error
    pub fn status<S: Into<String>>(endpoint: S, status: u16) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Whether the failure came from talking to the backend
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NetMapError::Http(_)
                | NetMapError::Status { .. }
                | NetMapError::Json(_)
                | NetMapError::Connection(_)
                | NetMapError::Timeout(_)
        )
    }

    /// Short error kind used as a structured logging field
    pub fn kind(&self) -> &'static str {
        match self {
            NetMapError::Http(_) => "http",
            NetMapError::Status { .. } => "status",
            NetMapError::Json(_) => "json",
            NetMapError::Connection(_) => "connection",
            NetMapError::Timeout(_) => "timeout",
            NetMapError::Config(_) => "config",
            NetMapError::InvalidInput(_) => "invalid_input",
            NetMapError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = NetMapError::status("/api/network/odp", 503);
        assert_eq!(err.to_string(), "Endpoint /api/network/odp returned HTTP 503");
        assert!(err.is_transport());
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_config_error_is_not_transport() {
        let err = NetMapError::config("base URL must use http or https");
        assert!(!err.is_transport());
        assert_eq!(err.kind(), "config");
    }
}
