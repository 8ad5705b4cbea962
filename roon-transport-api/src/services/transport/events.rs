//! Typed payloads of the transport service's subscriptions
//!
//! Events are always forwarded as raw JSON; these types are the decoding
//! targets for `SubscriptionEvent::decode`.

use serde::{Deserialize, Serialize};

use crate::model::{Output, OutputId, QueueItem, Zone, ZoneId};

// =============================================================================
// ZONES
// =============================================================================

/// Snapshot delivered with `Subscribed` on the zones topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonesSubscribed {
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Delta delivered with `Changed` on the zones topic
///
/// Each list is optional; an absent list means no change in that category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonesChanged {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones_removed: Option<Vec<RemovedZone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones_added: Option<Vec<Zone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones_changed: Option<Vec<Zone>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones_seek_changed: Option<Vec<ZoneSeekChange>>,
}

impl ZonesChanged {
    /// Whether the delta carries no list at all
    pub fn is_empty(&self) -> bool {
        self.zones_removed.is_none()
            && self.zones_added.is_none()
            && self.zones_changed.is_none()
            && self.zones_seek_changed.is_none()
    }
}

/// An entry of `zones_removed`: cores send bare ids, some send records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemovedZone {
    Id(ZoneId),
    Record { zone_id: ZoneId },
}

impl RemovedZone {
    pub fn zone_id(&self) -> &ZoneId {
        match self {
            RemovedZone::Id(zone_id) | RemovedZone::Record { zone_id } => zone_id,
        }
    }
}

impl From<&str> for RemovedZone {
    fn from(zone_id: &str) -> Self {
        RemovedZone::Id(ZoneId::new(zone_id))
    }
}

/// High-frequency partial update of a zone's seek fields
///
/// Times are seconds and may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSeekChange {
    pub zone_id: ZoneId,
    #[serde(default)]
    pub seek_position: Option<f64>,
    #[serde(default)]
    pub queue_time_remaining: Option<f64>,
}

// =============================================================================
// OUTPUTS
// =============================================================================

/// Snapshot delivered with `Subscribed` on the outputs topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputsSubscribed {
    #[serde(default)]
    pub outputs: Vec<Output>,
}

/// Delta delivered with `Changed` on the outputs topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputsChanged {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_removed: Option<Vec<RemovedOutput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_added: Option<Vec<Output>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs_changed: Option<Vec<Output>>,
}

/// An entry of `outputs_removed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemovedOutput {
    Id(OutputId),
    Record { output_id: OutputId },
}

impl RemovedOutput {
    pub fn output_id(&self) -> &OutputId {
        match self {
            RemovedOutput::Id(output_id) | RemovedOutput::Record { output_id } => output_id,
        }
    }
}

// =============================================================================
// QUEUE
// =============================================================================

/// Snapshot delivered with `Subscribed` on the queue topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueSubscribed {
    #[serde(default)]
    pub items: Vec<QueueItem>,
}

/// Delta delivered with `Changed` on the queue topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueChanged {
    #[serde(default)]
    pub changes: Vec<QueueChange>,
}

impl QueueChanged {
    /// Apply every change in order to a local copy of the queue
    pub fn apply_to(&self, items: &mut Vec<QueueItem>) {
        for change in &self.changes {
            change.apply_to(items);
        }
    }
}

/// One positional edit of the play queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum QueueChange {
    Insert {
        index: usize,
        #[serde(default)]
        items: Vec<QueueItem>,
    },
    Remove {
        index: usize,
        count: usize,
    },
}

impl QueueChange {
    /// Apply this change, clamping out-of-range positions to the list bounds
    pub fn apply_to(&self, items: &mut Vec<QueueItem>) {
        match self {
            QueueChange::Insert { index, items: inserted } => {
                let at = (*index).min(items.len());
                items.splice(at..at, inserted.iter().cloned());
            }
            QueueChange::Remove { index, count } => {
                let start = (*index).min(items.len());
                let end = start.saturating_add(*count).min(items.len());
                items.drain(start..end);
            }
        }
    }
}
