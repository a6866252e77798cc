//! Media engine trait and supporting transport types.
//!
//! The engine holds at most one active track at a time and reports its own
//! state asynchronously: commands issued here are requests, and the
//! authoritative outcome always arrives later on the event stream returned
//! by [`MediaEngine::subscribe`].

use crate::error::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Track descriptor handed to the engine when (re)loading its queue.
///
/// Identity is the `url`; the remaining fields exist so the host can enrich
/// its platform media session (lock screen, notification entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueRequest {
    /// Opaque track identifier supplied by the application.
    pub id: String,
    /// Stream URL (typically HLS for generated episodes).
    pub url: String,
    /// Display title.
    pub title: String,
    /// Display artist, when known.
    pub artist: Option<String>,
    /// Artwork URI surfaced to the platform media session.
    pub artwork: Option<String>,
}

impl EnqueueRequest {
    /// Construct a request with the required identity fields.
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            artist: None,
            artwork: None,
        }
    }

    /// Attach an artist string.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Attach an artwork URI.
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }
}

/// Coarse transport states reported by the engine.
///
/// These are the engine's own notion of state, not the application's; the
/// playback core maps only the subset it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    /// Engine is buffering the current source.
    Buffering,
    /// A track is loaded and ready to play.
    Ready,
    /// Audio is audibly progressing.
    Playing,
    /// Playback is suspended at the current position.
    Paused,
    /// The current track ran to completion.
    Ended,
}

/// Notifications emitted by the engine on its subscription channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EngineEvent {
    /// Coarse state transition.
    StateChanged { state: EngineState },
    /// Periodic progress tick. Values are reported verbatim and may
    /// transiently disagree with each other (e.g. position past duration
    /// while the stream headers settle).
    Progress { position: f64, duration: f64 },
    /// Transport-level error. Delivery does not imply the engine stopped.
    Error { message: String },
}

/// Asynchronous media transport engine provided by the host platform.
///
/// All command methods may suspend arbitrarily long and must not be assumed
/// to have taken effect until a corresponding [`EngineEvent`] arrives.
#[async_trait::async_trait]
pub trait MediaEngine: Send + Sync {
    /// Initialize the engine. Idempotent: an "already initialized" condition
    /// is reported as success, so callers may race without coordination.
    async fn initialize(&self) -> Result<()>;

    /// Clear the queue and enqueue `track` as the single active item.
    async fn reset_and_enqueue(&self, track: EnqueueRequest) -> Result<()>;

    /// Begin or resume playback of the active track.
    async fn play(&self) -> Result<()>;

    /// Suspend playback, keeping the active track and position.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute position in seconds.
    async fn seek_to(&self, position: f64) -> Result<()>;

    /// Set output volume in `0.0..=1.0`.
    async fn set_volume(&self, volume: f32) -> Result<()>;

    /// Stop playback and clear the queue entirely.
    async fn reset(&self) -> Result<()>;

    /// Subscribe to the engine's notification stream. Each call returns an
    /// independent receiver; dropping it is the unsubscribe.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enqueue_request_builder() {
        let req = EnqueueRequest::new("p1::e1", "https://x/a.m3u8", "Episode 1")
            .with_artist("Narrator")
            .with_artwork("https://x/cover.png");
        assert_eq!(req.id, "p1::e1");
        assert_eq!(req.artist.as_deref(), Some("Narrator"));
        assert_eq!(req.artwork.as_deref(), Some("https://x/cover.png"));
    }

    #[test]
    fn engine_event_serialization() {
        let ev = EngineEvent::Progress {
            position: 12.5,
            duration: 300.0,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"kind\":\"progress\""));
        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
