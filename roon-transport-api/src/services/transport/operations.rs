//! Transport service operations
//!
//! Every request the transport service accepts, with its parameter enums and
//! boundary validation.

use serde::{Deserialize, Serialize, Serializer};

use crate::define_transport_operation;
use crate::model::{LoopMode, Output, Zone};
use crate::operation::{require_finite, Validate, ValidationError};

// =============================================================================
// PARAMETERS
// =============================================================================

/// Mute action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuteHow {
    Mute,
    Unmute,
}

/// How a volume value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeHow {
    /// Set the volume to the value
    Absolute,
    /// Add the value to the current volume
    Relative,
    /// Move by the value times the control's step
    RelativeStep,
}

/// How a seek target is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekHow {
    Relative,
    Absolute,
}

/// Transport control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Start playback if paused or stopped
    Play,
    /// Pause playback if playing or loading
    Pause,
    /// Toggle between play and pause
    PlayPause,
    /// Stop playback and release the audio device
    Stop,
    /// Go to the start of the current track, or to the previous track
    Previous,
    /// Advance to the next track
    Next,
}

impl Control {
    /// Whether the zone currently advertises this control
    ///
    /// `PlayPause` and `Stop` have no flag of their own: play-pause needs
    /// either play or pause, stop is allowed whenever pause or play is.
    pub fn is_allowed_on(&self, zone: &Zone) -> bool {
        match self {
            Control::Play => zone.is_play_allowed,
            Control::Pause => zone.is_pause_allowed,
            Control::PlayPause | Control::Stop => zone.is_play_allowed || zone.is_pause_allowed,
            Control::Previous => zone.is_previous_allowed,
            Control::Next => zone.is_next_allowed,
        }
    }
}

/// Settings to change on a zone; absent fields are left as they are
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_radio: Option<bool>,
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_mode: Option<LoopMode>,
}

impl SettingsChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = Some(shuffle);
        self
    }

    pub fn auto_radio(mut self, auto_radio: bool) -> Self {
        self.auto_radio = Some(auto_radio);
        self
    }

    pub fn loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = Some(loop_mode);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.shuffle.is_none() && self.auto_radio.is_none() && self.loop_mode.is_none()
    }
}

/// Serialize whole numbers as JSON integers so `30.0` goes out as `30`
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// =============================================================================
// BULK ACTIONS
// =============================================================================

define_transport_operation! {
    operation: MuteAllOperation,
    method: "mute_all",
    request: {
        how: MuteHow,
    },
    response: (),
}

impl Validate for MuteAllOperationRequest {}

define_transport_operation! {
    operation: PauseAllOperation,
    method: "pause_all",
    request: {},
    response: (),
}

impl Validate for PauseAllOperationRequest {}

// =============================================================================
// OUTPUT ACTIONS
// =============================================================================

define_transport_operation! {
    operation: StandbyOperation,
    method: "standby",
    request: {
        output_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        control_key: Option<String>,
    },
    response: (),
}

impl Validate for StandbyOperationRequest {}

define_transport_operation! {
    operation: ToggleStandbyOperation,
    method: "toggle_standby",
    request: {
        output_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        control_key: Option<String>,
    },
    response: (),
}

impl Validate for ToggleStandbyOperationRequest {}

define_transport_operation! {
    operation: ConvenienceSwitchOperation,
    method: "convenience_switch",
    request: {
        output_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        control_key: Option<String>,
    },
    response: (),
}

impl Validate for ConvenienceSwitchOperationRequest {}

define_transport_operation! {
    operation: MuteOperation,
    method: "mute",
    request: {
        output_id: String,
        how: MuteHow,
    },
    response: (),
}

impl Validate for MuteOperationRequest {}

define_transport_operation! {
    operation: ChangeVolumeOperation,
    method: "change_volume",
    request: {
        output_id: String,
        how: VolumeHow,
        #[serde(serialize_with = "serialize_number")]
        value: f64,
    },
    response: (),
}

impl Validate for ChangeVolumeOperationRequest {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        require_finite("value", self.value)
    }
}

// =============================================================================
// ZONE ACTIONS
// =============================================================================

define_transport_operation! {
    operation: SeekOperation,
    method: "seek",
    request: {
        zone_or_output_id: String,
        how: SeekHow,
        #[serde(serialize_with = "serialize_number")]
        seconds: f64,
    },
    response: (),
}

impl Validate for SeekOperationRequest {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        require_finite("seconds", self.seconds)
    }
}

define_transport_operation! {
    operation: ControlOperation,
    method: "control",
    request: {
        zone_or_output_id: String,
        control: Control,
    },
    response: (),
}

impl Validate for ControlOperationRequest {}

define_transport_operation! {
    operation: TransferZoneOperation,
    method: "transfer_zone",
    request: {
        from_zone_or_output_id: String,
        to_zone_or_output_id: String,
    },
    response: (),
}

impl Validate for TransferZoneOperationRequest {}

define_transport_operation! {
    operation: ChangeSettingsOperation,
    method: "change_settings",
    request: {
        zone_or_output_id: String,
        #[serde(flatten)]
        settings: SettingsChange,
    },
    response: (),
}

impl Validate for ChangeSettingsOperationRequest {}

define_transport_operation! {
    operation: PlayFromHereOperation,
    method: "play_from_here",
    request: {
        zone_or_output_id: String,
        queue_item_id: u64,
    },
    response: (),
}

impl Validate for PlayFromHereOperationRequest {}

// =============================================================================
// GROUPING
// =============================================================================

define_transport_operation! {
    operation: GroupOutputsOperation,
    method: "group_outputs",
    request: {
        output_ids: Vec<String>,
    },
    response: (),
}

impl Validate for GroupOutputsOperationRequest {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        if self.output_ids.is_empty() {
            return Err(ValidationError::missing("output_ids"));
        }
        Ok(())
    }
}

define_transport_operation! {
    operation: UngroupOutputsOperation,
    method: "ungroup_outputs",
    request: {
        output_ids: Vec<String>,
    },
    response: (),
}

impl Validate for UngroupOutputsOperationRequest {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        if self.output_ids.is_empty() {
            return Err(ValidationError::missing("output_ids"));
        }
        Ok(())
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Body of a `get_zones` success reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetZonesResponse {
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Body of a `get_outputs` success reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetOutputsResponse {
    #[serde(default)]
    pub outputs: Vec<Output>,
}

define_transport_operation! {
    operation: GetZonesOperation,
    method: "get_zones",
    request: {},
    response: GetZonesResponse,
}

impl Validate for GetZonesOperationRequest {}

define_transport_operation! {
    operation: GetOutputsOperation,
    method: "get_outputs",
    request: {},
    response: GetOutputsResponse,
}

impl Validate for GetOutputsOperationRequest {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::operation::{TransportOperation, ValidationLevel};
    use serde_json::json;

    #[test]
    fn test_empty_request_has_no_body() {
        let body = PauseAllOperation::build_body(&PauseAllOperationRequest {}, ValidationLevel::Boundary)
            .unwrap();
        assert!(body.is_none());
    }

    #[test]
    fn test_standby_omits_missing_control_key() {
        let request = StandbyOperationRequest {
            output_id: "o1".to_string(),
            control_key: None,
        };
        let body = StandbyOperation::build_body(&request, ValidationLevel::Boundary).unwrap();
        assert_eq!(body, Some(json!({"output_id": "o1"})));
    }

    #[test]
    fn test_change_volume_body() {
        let request = ChangeVolumeOperationRequest {
            output_id: "o1".to_string(),
            how: VolumeHow::RelativeStep,
            value: -2.0,
        };
        let body = ChangeVolumeOperation::build_body(&request, ValidationLevel::Boundary).unwrap();
        assert_eq!(body, Some(json!({"output_id": "o1", "how": "relative_step", "value": -2})));
    }

    #[test]
    fn test_fractional_volume_keeps_fraction() {
        let request = ChangeVolumeOperationRequest {
            output_id: "o1".to_string(),
            how: VolumeHow::Absolute,
            value: -50.5,
        };
        let body = ChangeVolumeOperation::build_body(&request, ValidationLevel::Boundary).unwrap();
        assert_eq!(body.unwrap()["value"], json!(-50.5));
    }

    #[test]
    fn test_non_finite_seek_is_rejected_at_boundary() {
        let request = SeekOperationRequest {
            zone_or_output_id: "z1".to_string(),
            how: SeekHow::Absolute,
            seconds: f64::NAN,
        };
        let result = SeekOperation::build_body(&request, ValidationLevel::Boundary);
        assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
    }

    #[test]
    fn test_change_settings_flattens_present_fields() {
        let request = ChangeSettingsOperationRequest {
            zone_or_output_id: "z1".to_string(),
            settings: SettingsChange::new().shuffle(true).loop_mode(LoopMode::Next),
        };
        let body = ChangeSettingsOperation::build_body(&request, ValidationLevel::Boundary).unwrap();
        assert_eq!(
            body,
            Some(json!({"zone_or_output_id": "z1", "shuffle": true, "loop": "next"}))
        );
    }

    #[test]
    fn test_empty_group_is_rejected_unless_validation_is_off() {
        let request = GroupOutputsOperationRequest { output_ids: vec![] };
        assert!(GroupOutputsOperation::build_body(&request, ValidationLevel::Boundary).is_err());
        assert_eq!(
            GroupOutputsOperation::build_body(&request, ValidationLevel::None).unwrap(),
            Some(json!({"output_ids": []}))
        );
    }

    #[test]
    fn test_control_names() {
        assert_eq!(serde_json::to_value(Control::PlayPause).unwrap(), json!("playpause"));
        assert_eq!(serde_json::to_value(Control::Previous).unwrap(), json!("previous"));
    }

    #[test]
    fn test_control_allowed_flags() {
        let mut zone = Zone::new("z1", "Den");
        zone.is_pause_allowed = true;
        assert!(Control::Pause.is_allowed_on(&zone));
        assert!(Control::PlayPause.is_allowed_on(&zone));
        assert!(!Control::Next.is_allowed_on(&zone));
    }

    #[test]
    fn test_get_zones_parses_body() {
        let response = GetZonesOperation::parse_response(Some(json!({
            "zones": [{"zone_id": "z1"}]
        })))
        .unwrap();
        assert_eq!(response.zones.len(), 1);

        let error = GetZonesOperation::parse_response(Some(json!({"zones": 3}))).unwrap_err();
        assert!(matches!(error, ApiError::ParseError(_)));
    }

    #[test]
    fn test_unit_response_ignores_body() {
        assert!(MuteOperation::parse_response(None).is_ok());
        assert!(MuteOperation::parse_response(Some(json!({"extra": 1}))).is_ok());
    }
}
