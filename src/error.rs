//! Error types for the Fritz!Box SmartHome plugin
//!
//! Every fallible operation returns [`Result`]. Errors are fatal for the
//! invocation: the dispatcher turns them into a single message on stderr and a
//! non-zero exit status.

use thiserror::Error;

/// Result type alias for plugin operations
pub type Result<T> = std::result::Result<T, FritzboxError>;

/// Error types for Fritz!Box SmartHome operations
#[derive(Error, Debug)]
pub enum FritzboxError {
    /// Connection errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Device list is missing data every device must carry
    #[error("Malformed device data: {0}")]
    MalformedData(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Output errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FritzboxError {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a malformed data error
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedData(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Short category name used as a structured log field
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) | Self::Http(_) | Self::Timeout(_) => "connection",
            Self::Authentication(_) => "authentication",
            Self::Json(_) | Self::MalformedData(_) => "data",
            Self::Config(_) => "configuration",
            Self::Io(_) => "output",
        }
    }

    /// Check if this error is an authentication error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
