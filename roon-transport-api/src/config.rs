//! Client configuration
//!
//! Defaults target the standard transport service with boundary validation.
//! Hosts can override them in code, from the environment, or by embedding
//! `ClientConfig` in their own serde-based configuration.

use serde::Deserialize;

use crate::error::ApiError;
use crate::operation::ValidationLevel;
use crate::service::SERVICE_NAME;

/// Environment variable overriding the service name
pub const SERVICE_ENV: &str = "ROON_TRANSPORT_SERVICE";

/// Environment variable selecting the validation level (`none` or `boundary`)
pub const VALIDATION_ENV: &str = "ROON_TRANSPORT_VALIDATION";

/// Environment variable sizing each subscription's event buffer
pub const EVENT_BUFFER_ENV: &str = "ROON_TRANSPORT_EVENT_BUFFER";

/// Events a subscription holds for a subscriber that is not draining
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Configuration for a `TransportClient`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service name prefixed to every request and subscription
    /// Default: "com.roonlabs.transport:2"
    pub service_name: String,

    /// Parameter validation applied before sending
    /// Default: Boundary
    pub validation: ValidationLevel,

    /// Undrained events kept per subscription; older ones are dropped and
    /// counted once a subscriber falls this far behind. Zero is treated as one.
    /// Default: 256
    pub event_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_name: SERVICE_NAME.to_string(),
            validation: ValidationLevel::Boundary,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ClientConfig {
    /// Create a ClientConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ClientConfig that sends parameters unchecked
    pub fn unvalidated() -> Self {
        Self {
            validation: ValidationLevel::None,
            ..Default::default()
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_validation(mut self, validation: ValidationLevel) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    /// Build a configuration from the environment, falling back to defaults
    ///
    /// Reads `ROON_TRANSPORT_SERVICE`, `ROON_TRANSPORT_VALIDATION` and
    /// `ROON_TRANSPORT_EVENT_BUFFER`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();

        if let Some(service_name) = lookup(SERVICE_ENV).filter(|s| !s.trim().is_empty()) {
            config.service_name = service_name.trim().to_string();
        }
        if let Some(validation) = lookup(VALIDATION_ENV) {
            config.validation = validation.parse()?;
        }
        if let Some(event_buffer) = lookup(EVENT_BUFFER_ENV) {
            config.event_buffer = event_buffer.trim().parse().map_err(|_| {
                ApiError::InvalidParameter(format!(
                    "{} must be a count, got '{}'",
                    EVENT_BUFFER_ENV, event_buffer
                ))
            })?;
        }

        Ok(config)
    }
}
