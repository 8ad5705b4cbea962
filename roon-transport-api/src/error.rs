//! Error types for roon-transport-api

use thiserror::Error;

use crate::operation::ValidationError;

/// Errors surfaced by transport commands and subscriptions
///
/// Every command resolves exactly once, either with its decoded body or with
/// one of these. `code()` gives the short error value callers compare against:
/// the service's reply name for protocol errors, or the variant name otherwise.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// A required target was absent
    ///
    /// No request was sent. The payload names the missing argument.
    #[error("Missing target: {0}")]
    MissingTarget(&'static str),

    /// The service answered with a non-success reply name
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The transport delivered no reply at all
    #[error("Network error")]
    NetworkError,

    /// Response parsing error
    ///
    /// The service replied with success, but the body does not decode into
    /// the expected type.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid parameter value
    ///
    /// Returned before sending when boundary validation rejects a parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// Short error value for this failure
    pub fn code(&self) -> &str {
        match self {
            ApiError::MissingTarget(_) => "MissingTarget",
            ApiError::Protocol(name) => name,
            ApiError::NetworkError => "NetworkError",
            ApiError::ParseError(_) => "ParseError",
            ApiError::InvalidParameter(_) => "InvalidParameter",
        }
    }

    /// Whether the request never left the client
    pub fn is_precondition_failure(&self) -> bool {
        matches!(self, ApiError::MissingTarget(_) | ApiError::InvalidParameter(_))
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Convert from ValidationError to ApiError
impl From<ValidationError> for ApiError {
    fn from(validation_error: ValidationError) -> Self {
        match validation_error {
            ValidationError::InvalidValue { parameter, value, reason } => ApiError::InvalidParameter(
                format!("Invalid value '{}' for parameter '{}': {}", value, parameter, reason),
            ),
            ValidationError::MissingParameter { parameter } => {
                ApiError::InvalidParameter(format!("Required parameter '{}' is missing", parameter))
            }
            ValidationError::Custom { parameter, message } => {
                ApiError::InvalidParameter(format!("Parameter '{}': {}", parameter, message))
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::ParseError(error.to_string())
    }
}
