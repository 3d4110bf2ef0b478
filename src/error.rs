//! Error types for the G-Core cloud client
//!
//! Every public operation returns `Result<T, Error>`. Each variant belongs to
//! exactly one [`Stage`], so callers can tell whether a call was rejected
//! before any request, failed on the wire, or received a payload it could not
//! interpret.

use thiserror::Error;

/// The main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Validation Errors
    // ============================================================================
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decode Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode {target}: {message}")]
    Decode { target: String, message: String },

    #[error("Discriminator field '{field}' not specified, unable to decode {target}")]
    MissingDiscriminator { field: String, target: String },

    #[error("Invalid {field} value for {target}: {value}")]
    UnknownDiscriminator {
        field: String,
        target: String,
        value: String,
    },

    #[error("Inconsistent {target}: {message}")]
    InvariantViolation { target: String, message: String },

    #[error("Cannot decode {resource} information in task structure: {message}")]
    TaskResource { resource: String, message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Which stage of a call produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Client setup (config file, environment)
    Config,
    /// Option checks before any request is issued
    Validation,
    /// Connectivity, timeouts and non-2xx statuses
    Transport,
    /// Payload did not match the expected contract
    Decode,
    /// Anything else
    Other,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error for the given target type
    pub fn decode(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a task resource error
    pub fn task_resource(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskResource {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Classify the error by the stage that produced it
    pub fn stage(&self) -> Stage {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::YamlParse(_)
            | Error::Io(_) => Stage::Config,
            Error::Validation { .. } => Stage::Validation,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::RateLimited { .. }
            | Error::Timeout { .. }
            | Error::MaxRetriesExceeded { .. }
            | Error::InvalidUrl(_) => Stage::Transport,
            Error::JsonParse(_)
            | Error::Decode { .. }
            | Error::MissingDiscriminator { .. }
            | Error::UnknownDiscriminator { .. }
            | Error::InvariantViolation { .. }
            | Error::TaskResource { .. } => Stage::Decode,
            Error::Other(_) => Stage::Other,
        }
    }

    /// Check if this error is retryable by the transport
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, Error>;
