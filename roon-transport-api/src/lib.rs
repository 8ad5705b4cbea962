//! Type-safe client for the Roon transport service
//!
//! This crate is the command dispatcher of roon-transport. It turns typed
//! commands (control, seek, volume, grouping, settings, standby, ...) into
//! single requests on a [`moo_client::MooTransport`] session and normalizes
//! each reply into a `Result`. It also opens passthrough subscriptions for the
//! outputs and queue topics; the zone mirror lives in `roon-transport-state`.
//!
//! ```rust,ignore
//! use roon_transport_api::{Control, TransportClient};
//!
//! let client = TransportClient::new(session);
//! let zones = client.get_zones().await?.zones;
//! client.control(&zones[0], Control::PlayPause).await?;
//!
//! let mut queue = client.subscribe_queue(&zones[0], 100)?;
//! while let Some(event) = queue.next().await {
//!     println!("{}: {}", event.tag, event.body);
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod operation;
pub mod reply;
pub mod service;
pub mod services;
pub mod subscription;

pub use client::TransportClient;
pub use config::ClientConfig;
pub use error::{ApiError, Result};
pub use model::*;
pub use operation::{TransportOperation, Validate, ValidationError, ValidationLevel};
pub use reply::{normalize_reply, PendingReply};
pub use service::{Topic, SERVICE_NAME};
pub use services::transport::*;
pub use subscription::{Subscription, SubscriptionEvent};

pub use moo_client::{MooTransport, Reply, ResponseTag, SubscriptionKey};
