//! Playback data model: tracks, transport states, and the canonical snapshot.

use serde::{Deserialize, Serialize};

/// One playable unit. Immutable once loaded; display metadata may be patched
/// in place via [`TrackPatch`](crate::TrackPatch) without a reload as long as
/// the `url` stays the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    /// Composite identifier, `"<podcast>::<episode>"` for generated episodes.
    pub id: String,
    /// Stream URL; this is the track's identity for load deduplication.
    pub url: String,
    /// Display title.
    pub title: String,
    /// Display artist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Cover artwork URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl AudioTrack {
    /// Create a track with the required identity fields.
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            artist: None,
            cover_image: None,
        }
    }

    /// Attach an artist.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Attach a cover image URI.
    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    /// Podcast half of the composite id, when present.
    ///
    /// Deep-link re-entry from a system notification resolves the screen to
    /// reopen from this value.
    pub fn podcast_id(&self) -> Option<&str> {
        self.id.split_once("::").map(|(podcast, _)| podcast)
    }

    /// Episode half of the composite id, when present.
    pub fn episode_id(&self) -> Option<&str> {
        self.id.split_once("::").map(|(_, episode)| episode)
    }
}

/// In-place metadata patch for the currently loaded track.
///
/// Only the fields that are `Some` are applied. A patch never touches the
/// engine and never changes the transport state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPatch {
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub cover_image: Option<String>,
}

impl TrackPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    /// Returns `true` if no field would be changed.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.title.is_none()
            && self.artist.is_none()
            && self.cover_image.is_none()
    }
}

/// Application-visible transport state.
///
/// `Loading` is entered on every load request and is the only state whose
/// exit is gated on load-ticket matching; `Error` is terminal until a new
/// load request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    /// No track has been requested.
    Idle,
    /// A load request is in flight.
    Loading,
    /// The requested track is active and ready.
    Ready,
    /// Audio is progressing.
    Playing,
    /// Playback is suspended.
    Paused,
    /// The most recent load request failed.
    Error,
}

impl TransportState {
    /// Returns `true` when a track is active, i.e. engine play/pause
    /// transitions are meaningful.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TransportState::Ready | TransportState::Playing | TransportState::Paused
        )
    }
}

/// The canonical, externally observed playback state tuple.
///
/// Every UI surface (full player, mini-player, waveform scrubber) renders
/// from the same snapshot, so they can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub current_track: Option<AudioTrack>,
    pub transport: TransportState,
    /// Playback position in seconds, written verbatim from engine ticks.
    pub position: f64,
    /// Track duration in seconds, written verbatim from engine ticks.
    pub duration: f64,
    pub is_muted: bool,
    pub is_shuffled: bool,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_track: None,
            transport: TransportState::Idle,
            position: 0.0,
            duration: 0.0,
            is_muted: false,
            is_shuffled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id_split() {
        let track = AudioTrack::new("pod-1::ep-9", "https://x/a.m3u8", "A");
        assert_eq!(track.podcast_id(), Some("pod-1"));
        assert_eq!(track.episode_id(), Some("ep-9"));

        let plain = AudioTrack::new("ep-9", "https://x/a.m3u8", "A");
        assert_eq!(plain.podcast_id(), None);
        assert_eq!(plain.episode_id(), None);
    }

    #[test]
    fn transport_activity() {
        assert!(TransportState::Ready.is_active());
        assert!(TransportState::Playing.is_active());
        assert!(TransportState::Paused.is_active());
        assert!(!TransportState::Idle.is_active());
        assert!(!TransportState::Loading.is_active());
        assert!(!TransportState::Error.is_active());
    }

    #[test]
    fn snapshot_default_is_idle() {
        let snap = PlaybackSnapshot::default();
        assert_eq!(snap.transport, TransportState::Idle);
        assert!(snap.current_track.is_none());
        assert_eq!(snap.position, 0.0);
        assert_eq!(snap.duration, 0.0);
        assert!(!snap.is_muted);
        assert!(!snap.is_shuffled);
    }

    #[test]
    fn empty_patch() {
        assert!(TrackPatch::new().is_empty());
        assert!(!TrackPatch::new().title("x").is_empty());
    }
}
