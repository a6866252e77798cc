//! Discrete player events broadcast alongside the snapshot stream.
//!
//! The snapshot channel carries continuous state; this bus carries one-shot
//! happenings that consumers act on exactly once (play-count recording,
//! deep-link bookkeeping). Uses `tokio::sync::broadcast`, so any number of
//! subscribers can listen independently and slow ones lag rather than block.

use crate::track::AudioTrack;
use serde::{Deserialize, Serialize};

/// Default buffer size for the player event channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 32;

/// One-shot notifications emitted by the playback store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// A load request completed and its result was accepted (not superseded).
    TrackLoaded { track: AudioTrack },
    /// A load request failed while it was still the most recent one.
    LoadFailed { url: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serialization_round_trip() {
        let event = PlayerEvent::LoadFailed {
            url: "https://x/a.m3u8".to_string(),
            message: "enqueue rejected".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event\":\"loadFailed\""));
        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
