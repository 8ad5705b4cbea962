//! Error types for the MOO transport contract

use thiserror::Error;

use crate::SubscriptionKey;

/// Errors raised by transport implementations outside the reply contract
///
/// Replies and events never carry this type: a failed request is reported to
/// its reply handler as a missing reply. These errors cover misuse of a
/// transport object itself, such as driving the mock with nothing pending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MooError {
    /// No request is waiting for a reply
    #[error("No pending request to reply to")]
    NoPendingRequest,

    /// The subscription key is unknown or was already torn down
    #[error("Unknown or inactive subscription: {0}")]
    UnknownSubscription(SubscriptionKey),
}
