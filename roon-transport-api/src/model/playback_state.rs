//! Playback state enumeration

use serde::{Deserialize, Serialize};

/// Current playback state of a zone or output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PlaybackState {
    /// Currently playing audio
    Playing,
    /// Playback is paused
    Paused,
    /// Buffering before playback starts
    Loading,
    /// Playback is stopped
    Stopped,
}

impl PlaybackState {
    /// Parse from the service's state name
    ///
    /// Unknown names are treated as stopped.
    pub fn from_state_name(state: &str) -> Self {
        match state {
            "playing" => PlaybackState::Playing,
            "paused" => PlaybackState::Paused,
            "loading" => PlaybackState::Loading,
            _ => PlaybackState::Stopped,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

impl From<String> for PlaybackState {
    fn from(state: String) -> Self {
        PlaybackState::from_state_name(&state)
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_state_name() {
        assert_eq!(PlaybackState::from_state_name("playing"), PlaybackState::Playing);
        assert_eq!(PlaybackState::from_state_name("paused"), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_state_name("loading"), PlaybackState::Loading);
        assert_eq!(PlaybackState::from_state_name("stopped"), PlaybackState::Stopped);
    }

    #[test]
    fn test_unknown_state_is_stopped() {
        let state: PlaybackState = serde_json::from_str("\"rewinding\"").unwrap();
        assert_eq!(state, PlaybackState::Stopped);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlaybackState::Loading).unwrap(),
            "\"loading\""
        );
    }
}
