//! Error type definitions
//!
//! Defines the main error type used throughout the client and the mapping
//! from HTTP statuses and transport failures onto it.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Humble client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The session is missing or was rejected by the server (401)
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The server refused access to the resource (403)
    #[error("Access denied")]
    AccessDenied,

    /// The requested resource does not exist (404)
    #[error("Not found")]
    NotFound,

    /// The server throttled the client (429)
    #[error("Too many requests")]
    TooManyRequests,

    /// The backend is down or failing (5xx)
    #[error("Backend not available (HTTP {status})")]
    BackendNotAvailable { status: u16 },

    /// The backend did not answer in time
    #[error("Backend timeout")]
    BackendTimeout,

    /// Any other non-success status
    #[error("Backend error (HTTP {status})")]
    BackendError { status: u16 },

    /// Transport failure before a status was received
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with something this client cannot interpret
    #[error("Unknown backend response: {0}")]
    UnknownBackendResponse(String),

    /// The auth cookie could not be decoded into a user id
    #[error("Cookie decode error: {0}")]
    CookieDecode(String),

    /// A download record has no usable web link
    #[error("No download web link in download struct item {0}")]
    MissingWebLink(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown backend response error
    pub fn unknown_backend_response(msg: impl Into<String>) -> Self {
        Self::UnknownBackendResponse(msg.into())
    }

    /// Create a cookie decode error
    pub fn cookie_decode(msg: impl Into<String>) -> Self {
        Self::CookieDecode(msg.into())
    }

    /// Create a missing web link error for the given record
    pub fn missing_web_link(record: impl std::fmt::Debug) -> Self {
        Self::MissingWebLink(format!("{:?}", record))
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::AuthenticationRequired,
            403 => Self::AccessDenied,
            404 => Self::NotFound,
            429 => Self::TooManyRequests,
            504 => Self::BackendTimeout,
            code @ 500..=599 => Self::BackendNotAvailable { status: code },
            code => Self::BackendError { status: code },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status);
        }
        if err.is_timeout() {
            return Self::BackendTimeout;
        }
        if err.is_decode() {
            return Self::UnknownBackendResponse(err.to_string());
        }
        Self::Network(err.to_string())
    }
}
