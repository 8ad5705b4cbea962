//! Operation framework for transport service requests
//!
//! Each request the service understands is a `TransportOperation`: a method
//! name, a serializable request type that can validate itself, and a response
//! type decoded from the success reply's body. Most operations are generated
//! with [`define_transport_operation!`](crate::define_transport_operation).

pub mod macros;

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Required parameter '{parameter}' is missing")]
    MissingParameter { parameter: String },

    #[error("Parameter '{parameter}' failed validation: {message}")]
    Custom { parameter: String, message: String },
}

impl ValidationError {
    pub fn invalid_value(parameter: &str, value: impl std::fmt::Display, reason: &str) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn missing(parameter: &str) -> Self {
        Self::MissingParameter {
            parameter: parameter.to_string(),
        }
    }
}

/// Validation levels for operation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// No validation, requests go out as given
    None,
    /// Light validation at the API boundary: finite numbers, non-empty lists
    Boundary,
}

impl Default for ValidationLevel {
    fn default() -> Self {
        Self::Boundary
    }
}

impl FromStr for ValidationLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ValidationLevel::None),
            "boundary" => Ok(ValidationLevel::Boundary),
            other => Err(ValidationError::invalid_value(
                "validation",
                other,
                "expected 'none' or 'boundary'",
            )),
        }
    }
}

/// Trait for types that can be validated
pub trait Validate {
    /// Perform light validation at the API boundary
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Validate with the specified level
    fn validate(&self, level: ValidationLevel) -> Result<(), ValidationError> {
        match level {
            ValidationLevel::None => Ok(()),
            ValidationLevel::Boundary => self.validate_boundary(),
        }
    }
}

/// Reject NaN and infinities, which have no JSON representation
pub fn require_finite(parameter: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::invalid_value(parameter, value, "must be a finite number"))
    }
}

/// A request/reply operation of the transport service
pub trait TransportOperation: 'static {
    /// The request type for this operation
    type Request: Serialize + Validate;

    /// The response type decoded from the success reply's body
    type Response: DeserializeOwned + Send + 'static;

    /// Method name, appended to the service name
    const METHOD: &'static str;

    /// Validate the request and build the JSON body
    ///
    /// Requests without parameters are sent without a body.
    fn build_body(
        request: &Self::Request,
        level: ValidationLevel,
    ) -> Result<Option<Value>, ApiError> {
        request.validate(level)?;
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::InvalidParameter(e.to_string()))?;

        Ok(match body {
            Value::Null => None,
            Value::Object(ref fields) if fields.is_empty() => None,
            body => Some(body),
        })
    }

    /// Decode the body of a success reply
    fn parse_response(body: Option<Value>) -> Result<Self::Response, ApiError>;
}

/// Decode an optional reply body, treating a missing body as JSON null
pub fn decode_body<T: DeserializeOwned>(body: Option<Value>) -> Result<T, ApiError> {
    Ok(serde_json::from_value(body.unwrap_or(Value::Null))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_level_default() {
        assert_eq!(ValidationLevel::default(), ValidationLevel::Boundary);
    }

    #[test]
    fn test_validation_level_from_str() {
        assert_eq!("none".parse::<ValidationLevel>().unwrap(), ValidationLevel::None);
        assert_eq!(" Boundary ".parse::<ValidationLevel>().unwrap(), ValidationLevel::Boundary);
        assert!("comprehensive".parse::<ValidationLevel>().is_err());
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite("value", -12.5).is_ok());
        assert!(require_finite("value", f64::NAN).is_err());
        assert!(require_finite("seconds", f64::INFINITY).is_err());
    }

    struct TestRequest {
        value: f64,
    }

    impl Validate for TestRequest {
        fn validate_boundary(&self) -> Result<(), ValidationError> {
            require_finite("value", self.value)
        }
    }

    #[test]
    fn test_validation_levels() {
        let invalid = TestRequest { value: f64::NAN };
        assert!(invalid.validate(ValidationLevel::None).is_ok());
        assert!(invalid.validate(ValidationLevel::Boundary).is_err());
    }

    #[test]
    fn test_decode_body() {
        let zones: Vec<u32> = decode_body(Some(serde_json::json!([1, 2]))).unwrap();
        assert_eq!(zones, vec![1, 2]);
        assert!(matches!(decode_body::<Vec<u32>>(None), Err(ApiError::ParseError(_))));
    }
}
