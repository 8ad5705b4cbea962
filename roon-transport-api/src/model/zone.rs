//! Zone records as reported by the transport service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Output, OutputId, PlaybackState, ZoneId};

/// A logical playback destination spanning one or more outputs
///
/// Fields missing from the service's JSON take their defaults, so partial
/// records (as sent by some cores for idle zones) still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub zone_id: ZoneId,
    #[serde(default)]
    pub display_name: String,
    /// Outputs in this zone, in the order the service lists them
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub state: PlaybackState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seek_position: Option<f64>,
    #[serde(default)]
    pub is_previous_allowed: bool,
    #[serde(default)]
    pub is_next_allowed: bool,
    #[serde(default)]
    pub is_pause_allowed: bool,
    #[serde(default)]
    pub is_play_allowed: bool,
    #[serde(default)]
    pub is_seek_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_items_remaining: Option<i64>,
    /// Seconds remaining in the play queue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_time_remaining: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ZoneSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now_playing: Option<NowPlaying>,
    /// Fields this crate does not model, kept so records pass through intact
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Zone {
    /// Create an empty stopped zone
    pub fn new(zone_id: impl Into<ZoneId>, display_name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            display_name: display_name.into(),
            outputs: Vec::new(),
            state: PlaybackState::Stopped,
            seek_position: None,
            is_previous_allowed: false,
            is_next_allowed: false,
            is_pause_allowed: false,
            is_play_allowed: false,
            is_seek_allowed: false,
            queue_items_remaining: None,
            queue_time_remaining: None,
            settings: None,
            now_playing: None,
            extra: Map::new(),
        }
    }

    /// Find one of this zone's outputs by id
    pub fn output(&self, output_id: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.output_id == output_id)
    }

    pub fn has_output(&self, output_id: &str) -> bool {
        self.output(output_id).is_some()
    }

    pub fn output_ids(&self) -> impl Iterator<Item = &OutputId> {
        self.outputs.iter().map(|o| &o.output_id)
    }
}

/// Now-playing information, present while the zone has media loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Seek position in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seek_position: Option<f64>,
    /// Media length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_key: Option<String>,
    #[serde(default)]
    pub one_line: OneLine,
    #[serde(default)]
    pub two_line: TwoLine,
    #[serde(default)]
    pub three_line: ThreeLine,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Display text for one-line displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneLine {
    #[serde(default)]
    pub line1: String,
}

/// Display text for two-line displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoLine {
    #[serde(default)]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
}

/// Display text for three-line displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeLine {
    #[serde(default)]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
}

/// Per-zone playback settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSettings {
    #[serde(rename = "loop", default)]
    pub loop_mode: LoopMode,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub auto_radio: bool,
}

/// Loop mode of a zone
///
/// `Next` is only meaningful in a settings change, where it cycles to the
/// following mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LoopMode {
    Loop,
    LoopOne,
    Disabled,
    Next,
}

impl LoopMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopMode::Loop => "loop",
            LoopMode::LoopOne => "loop_one",
            LoopMode::Disabled => "disabled",
            LoopMode::Next => "next",
        }
    }
}

impl From<String> for LoopMode {
    fn from(mode: String) -> Self {
        match mode.as_str() {
            "loop" => LoopMode::Loop,
            "loop_one" => LoopMode::LoopOne,
            "next" => LoopMode::Next,
            _ => LoopMode::Disabled,
        }
    }
}

impl Default for LoopMode {
    fn default() -> Self {
        LoopMode::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_zone_decodes() {
        let zone: Zone = serde_json::from_value(json!({
            "zone_id": "z1",
            "outputs": [{"output_id": "o1"}]
        }))
        .unwrap();

        assert_eq!(zone.zone_id, "z1");
        assert_eq!(zone.state, PlaybackState::Stopped);
        assert!(!zone.is_play_allowed);
        assert!(zone.has_output("o1"));
        assert!(zone.now_playing.is_none());
    }

    #[test]
    fn test_full_zone_decodes() {
        let zone: Zone = serde_json::from_value(json!({
            "zone_id": "1601bb42",
            "display_name": "Kitchen",
            "outputs": [],
            "state": "playing",
            "seek_position": 61,
            "is_previous_allowed": true,
            "is_next_allowed": true,
            "is_pause_allowed": true,
            "is_play_allowed": false,
            "is_seek_allowed": true,
            "queue_items_remaining": 12,
            "queue_time_remaining": 2745,
            "settings": {"loop": "loop_one", "shuffle": true, "auto_radio": false},
            "now_playing": {
                "seek_position": 61,
                "length": 274,
                "image_key": "a3b1",
                "one_line": {"line1": "Alone - Kyle Dixon"},
                "two_line": {"line1": "Alone", "line2": "Kyle Dixon"},
                "three_line": {"line1": "Alone", "line2": "Kyle Dixon", "line3": "Stranger Things"}
            }
        }))
        .unwrap();

        assert!(zone.state.is_playing());
        assert_eq!(zone.queue_time_remaining, Some(2745.0));
        let settings = zone.settings.unwrap();
        assert_eq!(settings.loop_mode, LoopMode::LoopOne);
        assert!(settings.shuffle);
        let now_playing = zone.now_playing.unwrap();
        assert_eq!(now_playing.length, Some(274.0));
        assert_eq!(now_playing.three_line.line3.as_deref(), Some("Stranger Things"));
    }

    #[test]
    fn test_fractional_times_decode() {
        let zone: Zone = serde_json::from_value(json!({
            "zone_id": "z1",
            "seek_position": 12.25,
            "queue_time_remaining": 300.5,
            "now_playing": {"seek_position": 12.25, "length": 274.5}
        }))
        .unwrap();

        assert_eq!(zone.seek_position, Some(12.25));
        assert_eq!(zone.queue_time_remaining, Some(300.5));
        assert_eq!(zone.now_playing.unwrap().length, Some(274.5));
    }

    #[test]
    fn test_unknown_fields_survive_a_round_trip() {
        let raw = json!({
            "zone_id": "z1",
            "display_name": "Den",
            "is_play_allowed": true,
            "state": "paused",
            "outputs": [],
            "now_playing": {
                "length": 200,
                "one_line": {"line1": "Track"},
                "two_line": {"line1": "Track"},
                "three_line": {"line1": "Track"},
                "artist_image_keys": ["k1", "k2"]
            },
            "queue_items_remaining": 3
        });
        let zone: Zone = serde_json::from_value(raw).unwrap();
        let now_playing = zone.now_playing.as_ref().unwrap();
        assert_eq!(now_playing.extra["artist_image_keys"], json!(["k1", "k2"]));

        let encoded = serde_json::to_value(&zone).unwrap();
        assert_eq!(encoded["now_playing"]["artist_image_keys"], json!(["k1", "k2"]));
        assert_eq!(encoded["display_name"], "Den");
    }

    #[test]
    fn test_loop_mode_names() {
        for mode in [LoopMode::Loop, LoopMode::LoopOne, LoopMode::Disabled, LoopMode::Next] {
            let json = serde_json::to_value(mode).unwrap();
            assert_eq!(json, json!(mode.as_str()));
        }
    }

    #[test]
    fn test_output_lookup_within_zone() {
        let mut zone = Zone::new("z1", "Den");
        zone.outputs.push(Output::new("o1", "z1", "Amp"));
        assert_eq!(zone.output("o1").map(|o| o.display_name.as_str()), Some("Amp"));
        assert!(zone.output("o2").is_none());
        assert_eq!(zone.output_ids().count(), 1);
    }
}
