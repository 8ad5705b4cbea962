//! Output records and their volume and source controls

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{OutputId, PlaybackState, ZoneId};

/// A single audio endpoint, member of exactly one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub output_id: OutputId,
    /// The zone this output currently belongs to
    #[serde(default)]
    pub zone_id: ZoneId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub state: PlaybackState,
    /// Present for outputs that support volume control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_controls: Option<Vec<SourceControl>>,
    /// Fields this crate does not model, such as `can_group_with_output_ids`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Output {
    pub fn new(
        output_id: impl Into<OutputId>,
        zone_id: impl Into<ZoneId>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            output_id: output_id.into(),
            zone_id: zone_id.into(),
            display_name: display_name.into(),
            state: PlaybackState::Stopped,
            volume: None,
            source_controls: None,
            extra: Map::new(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.volume
            .as_ref()
            .and_then(|v| v.is_muted)
            .unwrap_or(false)
    }

    /// Find a source control by its control key
    pub fn source_control(&self, control_key: &str) -> Option<&SourceControl> {
        self.source_controls
            .as_deref()?
            .iter()
            .find(|c| c.control_key.as_deref() == Some(control_key))
    }
}

/// Volume descriptor of an output
///
/// Values, bounds and step are floating point in the control's native units
/// and may be negative (dB controls usually top out at 0). Incremental
/// controls carry none of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    #[serde(rename = "type", default)]
    pub kind: VolumeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_muted: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind of volume control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum VolumeType {
    /// Plain numeric range
    Number,
    /// Decibel range
    Db,
    /// Only "+" and "-" adjustments, no feedback
    Incremental,
}

impl From<String> for VolumeType {
    /// Unanticipated types are treated as `Number`
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "db" => VolumeType::Db,
            "incremental" => VolumeType::Incremental,
            _ => VolumeType::Number,
        }
    }
}

impl Default for VolumeType {
    fn default() -> Self {
        VolumeType::Number
    }
}

/// A source control of an output, such as an input selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceControl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_key: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub status: SourceControlStatus,
    #[serde(default)]
    pub supports_standby: bool,
}

/// Selection or standby status of a source control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SourceControlStatus {
    Selected,
    Deselected,
    Standby,
    Indeterminate,
}

impl From<String> for SourceControlStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "selected" => SourceControlStatus::Selected,
            "deselected" => SourceControlStatus::Deselected,
            "standby" => SourceControlStatus::Standby,
            _ => SourceControlStatus::Indeterminate,
        }
    }
}

impl Default for SourceControlStatus {
    fn default() -> Self {
        SourceControlStatus::Indeterminate
    }
}
