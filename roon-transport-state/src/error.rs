//! Error types for roon-transport-state

use std::fmt;

use roon_transport_api::ApiError;

/// Result type for roon-transport-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur while mirroring zone state
#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    /// A zone event body did not have the expected shape
    Decode {
        /// Wire tag of the event that failed
        tag: String,
        message: String,
    },

    /// Error from roon-transport-api
    Api(ApiError),
}

impl StateError {
    pub(crate) fn decode(tag: impl Into<String>, message: impl fmt::Display) -> Self {
        StateError::Decode {
            tag: tag.into(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Decode { tag, message } => {
                write!(f, "Failed to decode {} zone event: {}", tag, message)
            }
            StateError::Api(err) => write!(f, "API error: {}", err),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for StateError {
    fn from(err: ApiError) -> Self {
        StateError::Api(err)
    }
}
