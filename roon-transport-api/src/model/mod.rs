//! Model types for the transport service

mod ids;
mod output;
mod playback_state;
mod queue;
mod target;
mod zone;

pub use ids::{OutputId, ZoneId};
pub use output::{Output, SourceControl, SourceControlStatus, VolumeInfo, VolumeType};
pub use playback_state::PlaybackState;
pub use queue::QueueItem;
pub use target::{IntoTarget, TargetRef};
pub use zone::{LoopMode, NowPlaying, OneLine, ThreeLine, TwoLine, Zone, ZoneSettings};
