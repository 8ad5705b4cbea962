//! Zone mirror for the Roon transport service
//!
//! This crate keeps a local, always-current copy of every zone by
//! subscribing to the transport service's `zones` topic. A snapshot
//! (`Subscribed`) replaces the mirror; deltas (`Changed`) are applied in a
//! fixed order (removed, added, changed, seek); teardown (`Unsubscribed`)
//! discards it. Zones can then be looked up by zone id, by output id or by
//! any reference the command dispatcher accepts.
//!
//! ```rust,ignore
//! use roon_transport_api::{Control, TransportClient};
//! use roon_transport_state::SubscribeZonesExt;
//!
//! let client = TransportClient::new(session);
//! let mut zones = client.subscribe_zones();
//! zones.next().await; // snapshot
//!
//! if let Some(zone) = zones.zone_by_output_id(&output_id) {
//!     client.control(&zone, Control::PlayPause).await?;
//! }
//! ```

pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod mirror;
pub mod subscription;
pub mod synchronizer;

pub use decoder::{decode_zone_event, DecodedZoneEvent, ZoneEvent};
pub use diagnostics::{DiagnosticsSnapshot, MirrorDiagnostics};
pub use error::{Result, StateError};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use mirror::{ChangeSummary, ZoneMirror};
pub use subscription::{SubscribeZonesExt, ZoneSubscription};
pub use synchronizer::ZoneSynchronizer;
