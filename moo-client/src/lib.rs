//! Internal MOO transport contract for roon-transport
//!
//! This crate defines the narrow seam between the transport service client
//! and whatever owns the actual session with a core: named requests with a
//! single reply, and keyed subscriptions that deliver ordered events. It does
//! no framing or connection management of its own.

mod error;
mod message;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use error::MooError;
pub use message::{Reply, ResponseTag, SubscriptionKey, SUCCESS};
pub use transport::{request_name, EventHandler, MooTransport, ReplyHandler};
