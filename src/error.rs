// src/error.rs
//! Application error types with structured error handling.
//!
//! `AppError` covers everything the exporter can fail on. `FetchError`
//! is the cloneable classification stored in block and asset futures,
//! since a resolved future may be read more than once.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded: back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::ServiceUnavailable
                | Self::InternalError
                | Self::HttpStatus(408 | 429 | 500..=599)
        )
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("unsupported extension: {0}")]
    UnsupportedExtension(String),

    #[error("statusCode: {status}, URL: {url}")]
    AssetDownload { url: String, status: u16 },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),

    #[error(transparent)]
    NotionClient(#[from] NotionClientError),
}

impl AppError {
    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::NetworkFailure(e) => e.is_timeout() || e.is_connect(),
            AppError::NotionService { code, .. } => code.is_retryable(),
            AppError::NotionClient(NotionClientError::NotionApi { code, status, .. }) => {
                NotionErrorCode::from_api_response(code).is_retryable()
                    || matches!(status, 429 | 500..=599)
            }
            _ => false,
        }
    }
}

// Allow converting from anyhow::Error, preserving error chain
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Failures reading a Notion response body.
#[derive(Error, Debug)]
pub enum NotionClientError {
    #[error("Failed to deserialize response: {source}\nBody: {body}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Notion API error ({status}): {code} - {message}")]
    NotionApi {
        status: u32,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("Type conversion error: {message}")]
    ConversionError { message: String },
}

/// Why a block or asset future could not be resolved.
///
/// Stored inside futures and handed to every reader, hence `Clone`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The requested object was not found (404).
    NotFound { id: String },

    /// The API key is invalid or lacks access to the object.
    Unauthorized { reason: String },

    /// The API rate limit was exceeded.
    RateLimited,

    /// Network or transport error.
    Transport { message: String },

    /// The response could not be parsed.
    MalformedResponse { reason: String },

    /// The request was refused before reaching the network.
    Unsupported { reason: String },

    /// Nobody is servicing the request channel.
    Disconnected,

    /// Some other error occurred.
    Other { message: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "Object not found: {}", id),
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {}", reason),
            Self::RateLimited => write!(f, "Rate limited"),
            Self::Transport { message } => write!(f, "Transport error: {}", message),
            Self::MalformedResponse { reason } => write!(f, "Malformed response: {}", reason),
            Self::Unsupported { reason } => write!(f, "{}", reason),
            Self::Disconnected => write!(f, "request channel is closed"),
            Self::Other { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<&AppError> for FetchError {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::NotionService { code, message, .. } => match code {
                NotionErrorCode::ObjectNotFound | NotionErrorCode::HttpStatus(404) => {
                    Self::NotFound {
                        id: message.clone(),
                    }
                }
                NotionErrorCode::Unauthorized | NotionErrorCode::RestrictedResource => {
                    Self::Unauthorized {
                        reason: message.clone(),
                    }
                }
                NotionErrorCode::RateLimited => Self::RateLimited,
                _ => Self::Other {
                    message: err.to_string(),
                },
            },
            AppError::NotionClient(NotionClientError::NotionApi { code, message, .. }) => {
                match code.as_str() {
                    "object_not_found" => Self::NotFound {
                        id: message.clone(),
                    },
                    "unauthorized" | "restricted_resource" => Self::Unauthorized {
                        reason: message.clone(),
                    },
                    "rate_limited" => Self::RateLimited,
                    _ => Self::Other {
                        message: err.to_string(),
                    },
                }
            }
            AppError::NetworkFailure(_)
            | AppError::Io(_) => Self::Transport {
                message: err.to_string(),
            },
            AppError::MalformedResponse(_)
            | AppError::NotionClient(NotionClientError::Deserialization { .. }) => {
                Self::MalformedResponse {
                    reason: err.to_string(),
                }
            }
            AppError::UnsupportedExtension(_) | AppError::MissingConfiguration(_) => {
                Self::Unsupported {
                    reason: err.to_string(),
                }
            }
            _ => Self::Other {
                message: err.to_string(),
            },
        }
    }
}

impl From<AppError> for FetchError {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}
