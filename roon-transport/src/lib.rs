//! # roon-transport - Roon transport control with a live zone mirror
//!
//! One object for every transport command, subscription and zone lookup:
//!
//! ```rust,ignore
//! use roon_transport::{Control, RoonTransport, VolumeHow};
//!
//! let roon = RoonTransport::new(session);
//!
//! // Keep a local copy of every zone
//! let mut zones = roon.subscribe_zones();
//! zones.next().await;
//!
//! // Look zones up by zone id, output id or record
//! if let Some(zone) = roon.zone_by_output_id(&output_id) {
//!     roon.control(&zone, Control::PlayPause).await?;
//!     roon.change_volume(&zone.outputs[0], VolumeHow::Relative, -2.0).await?;
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! roon-transport (RoonTransport facade)
//!     ↓
//! roon-transport-state (zone mirror, synchronizer)
//!     ↓
//! roon-transport-api (commands, replies, passthrough subscriptions)
//!     ↓
//! moo-client (MooTransport session contract)
//! ```
//!
//! The session itself (connection, pairing, framing) is supplied by the host
//! as an `Arc<dyn MooTransport>`.

// Main exports
pub use error::TransportError;
pub use transport::RoonTransport;

// Re-export commonly used types
pub use roon_transport_api::{
    ApiError, ClientConfig, Control, IntoTarget, LoopMode, MooTransport, MuteHow, NowPlaying,
    Output, OutputId, PendingReply, PlaybackState, SeekHow, SettingsChange, Subscription,
    SubscriptionEvent, TargetRef, Topic, TransportClient, ValidationLevel, VolumeHow, Zone,
    ZoneId,
};
pub use roon_transport_state::{
    logging, DiagnosticsSnapshot, StateError, SubscribeZonesExt, ZoneSubscription,
    ZoneSynchronizer,
};

mod error;
mod transport;
