//! # Playback Store
//!
//! Single source of truth for playback state. The store forwards commands to
//! the [`MediaEngine`], but it never guesses at the engine's outcome: the
//! play/pause distinction and progress values are written exclusively by the
//! event synchronizer folding engine notifications back in.
//!
//! ## Load races
//!
//! The engine holds exactly one active track, and loads may overlap when the
//! user taps through episodes faster than streams resolve. Every `load_track`
//! call takes a monotonically increasing ticket at issue time and compares it
//! against the latest ticket at completion time, under the same lock. A
//! mismatch means a newer request was issued while this one was in flight;
//! the stale outcome (success or failure) mutates nothing. Last writer wins
//! by issuance order, not completion order.
//!
//! ## Ownership
//!
//! One store instance is created at the application's composition root and
//! shared by reference; there is no global state. Dropping the store (and
//! its synchronizer handle) is the dispose step.

use crate::error::Result;
use crate::events::{PlayerEvent, DEFAULT_EVENT_BUFFER_SIZE};
use crate::track::{AudioTrack, PlaybackSnapshot, TrackPatch, TransportState};
use media_bridge::{EngineEvent, EngineState, EnqueueRequest, MediaEngine};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{broadcast, watch, OnceCell};
use tracing::{debug, error, warn};

struct StoreInner {
    snapshot: PlaybackSnapshot,
    /// Ticket of the most recently issued load request. Incremented on every
    /// `load_track` and on `reset`, which supersedes in-flight loads too.
    load_seq: u64,
}

/// Process-wide playback store bound to one media engine.
pub struct PlayerStore<E: MediaEngine> {
    engine: Arc<E>,
    inner: Mutex<StoreInner>,
    /// Lazy at-most-once engine initialization.
    engine_init: OnceCell<()>,
    snapshot_tx: watch::Sender<PlaybackSnapshot>,
    events_tx: broadcast::Sender<PlayerEvent>,
}

impl<E: MediaEngine> PlayerStore<E> {
    /// Create a store for the given engine. The engine is not initialized
    /// until the first load request.
    pub fn new(engine: Arc<E>) -> Self {
        let (snapshot_tx, _) = watch::channel(PlaybackSnapshot::default());
        let (events_tx, _) = broadcast::channel(DEFAULT_EVENT_BUFFER_SIZE);
        Self {
            engine,
            inner: Mutex::new(StoreInner {
                snapshot: PlaybackSnapshot::default(),
                load_seq: 0,
            }),
            engine_init: OnceCell::new(),
            snapshot_tx,
            events_tx,
        }
    }

    /// The engine this store drives.
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Current snapshot by value.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.inner.lock().snapshot.clone()
    }

    /// Subscribe to snapshot changes. Every UI surface reads from receivers
    /// of this channel, so they observe identical state.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to discrete player events.
    pub fn events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events_tx.subscribe()
    }

    fn publish(&self, inner: &StoreInner) {
        self.snapshot_tx.send_replace(inner.snapshot.clone());
    }

    /// Load `track` into the engine, superseding any in-flight load.
    ///
    /// No-op when the track's `url` is already current and no load is in
    /// flight. On success the snapshot moves to `Ready` with the new track;
    /// on failure to `Error` with the track cleared, in both cases only if
    /// this request is still the most recently issued one. Superseded
    /// outcomes are dropped without error.
    pub async fn load_track(&self, track: AudioTrack) -> Result<()> {
        let ticket = {
            let mut inner = self.inner.lock();
            let already_current = inner
                .snapshot
                .current_track
                .as_ref()
                .is_some_and(|current| current.url == track.url);
            if already_current && inner.snapshot.transport != TransportState::Loading {
                debug!(url = %track.url, "track already loaded, skipping");
                return Ok(());
            }
            inner.load_seq += 1;
            inner.snapshot.transport = TransportState::Loading;
            inner.snapshot.position = 0.0;
            inner.snapshot.duration = 0.0;
            self.publish(&inner);
            inner.load_seq
        };

        let outcome = self.run_load(&track).await;

        let mut inner = self.inner.lock();
        if inner.load_seq != ticket {
            // A newer request owns the snapshot now; this result is inert.
            debug!(url = %track.url, "superseded load result dropped");
            return Ok(());
        }
        match outcome {
            Ok(()) => {
                inner.snapshot.current_track = Some(track.clone());
                inner.snapshot.transport = TransportState::Ready;
                self.publish(&inner);
                drop(inner);
                debug!(url = %track.url, "track loaded");
                let _ = self.events_tx.send(PlayerEvent::TrackLoaded { track });
                Ok(())
            }
            Err(e) => {
                inner.snapshot.current_track = None;
                inner.snapshot.transport = TransportState::Error;
                self.publish(&inner);
                drop(inner);
                error!(url = %track.url, error = %e, "track load failed");
                let _ = self.events_tx.send(PlayerEvent::LoadFailed {
                    url: track.url.clone(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_load(&self, track: &AudioTrack) -> Result<()> {
        self.engine_init
            .get_or_try_init(|| async { self.engine.initialize().await })
            .await?;

        let mut request = EnqueueRequest::new(&track.id, &track.url, &track.title);
        if let Some(artist) = &track.artist {
            request = request.with_artist(artist);
        }
        if let Some(cover) = &track.cover_image {
            request = request.with_artwork(cover);
        }
        self.engine.reset_and_enqueue(request).await?;
        Ok(())
    }

    /// Patch display metadata of the loaded track in place. Never touches
    /// the engine and never changes the transport state; a no-op when no
    /// track is loaded.
    pub fn update_track_metadata(&self, patch: TrackPatch) {
        let mut inner = self.inner.lock();
        let Some(track) = inner.snapshot.current_track.as_mut() else {
            return;
        };
        if let Some(id) = patch.id {
            track.id = id;
        }
        if let Some(title) = patch.title {
            track.title = title;
        }
        if let Some(artist) = patch.artist {
            track.artist = Some(artist);
        }
        if let Some(cover_image) = patch.cover_image {
            track.cover_image = Some(cover_image);
        }
        self.publish(&inner);
    }

    /// Ask the engine to play. The snapshot does not flip to `Playing` here;
    /// the authoritative transition arrives through the synchronizer.
    pub async fn play(&self) {
        if let Err(e) = self.engine.play().await {
            warn!(error = %e, "play command failed");
        }
    }

    /// Ask the engine to pause. See [`PlayerStore::play`].
    pub async fn pause(&self) {
        if let Err(e) = self.engine.pause().await {
            warn!(error = %e, "pause command failed");
        }
    }

    /// Play when paused, pause when playing.
    pub async fn toggle_play_pause(&self) {
        let playing = self.inner.lock().snapshot.transport == TransportState::Playing;
        if playing {
            self.pause().await;
        } else {
            self.play().await;
        }
    }

    /// Seek to an absolute position, clamped into `[0, duration]` before the
    /// command leaves the store. Engine ticks may transiently report values
    /// outside that range; commands never do.
    pub async fn seek_to(&self, position: f64) {
        let duration = self.inner.lock().snapshot.duration;
        let clamped = position.clamp(0.0, duration.max(0.0));
        if let Err(e) = self.engine.seek_to(clamped).await {
            warn!(position = clamped, error = %e, "seek command failed");
        }
    }

    /// Seek relative to the current position; negative deltas rewind.
    pub async fn seek_by(&self, delta: f64) {
        let position = self.inner.lock().snapshot.position;
        self.seek_to(position + delta).await;
    }

    /// Flip the mute flag and forward the matching volume command.
    ///
    /// The flag is store-owned because the engine does not reliably echo
    /// volume back, so it flips synchronously even if the command later
    /// fails.
    pub async fn toggle_mute(&self) {
        let muted = {
            let mut inner = self.inner.lock();
            inner.snapshot.is_muted = !inner.snapshot.is_muted;
            self.publish(&inner);
            inner.snapshot.is_muted
        };
        let volume = if muted { 0.0 } else { 1.0 };
        if let Err(e) = self.engine.set_volume(volume).await {
            warn!(volume, error = %e, "volume command failed");
        }
    }

    /// Flip the shuffle flag. Purely local; shuffling behavior itself lives
    /// outside this core.
    pub fn toggle_shuffle(&self) {
        let mut inner = self.inner.lock();
        inner.snapshot.is_shuffled = !inner.snapshot.is_shuffled;
        self.publish(&inner);
    }

    /// Stop the engine, clear its queue, and return the snapshot to its
    /// initial idle values. Supersedes any in-flight load. Used on sign-out
    /// and explicit player dismissal.
    pub async fn reset(&self) {
        if let Err(e) = self.engine.pause().await {
            warn!(error = %e, "pause during reset failed");
        }
        if let Err(e) = self.engine.reset().await {
            warn!(error = %e, "engine reset failed");
        }
        let mut inner = self.inner.lock();
        inner.load_seq += 1;
        inner.snapshot = PlaybackSnapshot::default();
        self.publish(&inner);
    }

    /// Fold one engine notification into the snapshot. Driven by the event
    /// synchronizer in delivery order.
    pub(crate) fn apply_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::StateChanged { state } => {
                let mut inner = self.inner.lock();
                // Play/pause transitions are meaningful only while a track is
                // active; a straggler from a superseded track must not clobber
                // an in-flight load.
                if !inner.snapshot.transport.is_active() {
                    return;
                }
                match state {
                    EngineState::Playing => inner.snapshot.transport = TransportState::Playing,
                    EngineState::Paused => inner.snapshot.transport = TransportState::Paused,
                    EngineState::Buffering | EngineState::Ready | EngineState::Ended => return,
                }
                self.publish(&inner);
            }
            EngineEvent::Progress { position, duration } => {
                let mut inner = self.inner.lock();
                inner.snapshot.position = position;
                inner.snapshot.duration = duration;
                self.publish(&inner);
            }
            EngineEvent::Error { message } => {
                // Transient mid-playback errors are logged only; moving to
                // `Error` is reserved for load-path failures so the UI is
                // never stranded without a reload affordance.
                error!(%message, "engine reported a transport error");
            }
        }
    }
}
