//! # Playback Synchronization Core
//!
//! State machine keeping application-visible playback state consistent with
//! an external, asynchronous media transport engine.
//!
//! ## Overview
//!
//! - [`store::PlayerStore`]: single source of truth for playback state;
//!   owns the load-race-avoidance algorithm and all command handlers.
//! - [`sync`]: folds engine notifications into the store, once per process.
//! - [`waveform`]: pure scrub-gesture state machine for the waveform view.
//!
//! Data flow: UI issues commands to the store, the store forwards transport
//! commands to the engine, the engine emits asynchronous events, and the
//! synchronizer writes them back into the store's snapshot. Every UI surface
//! subscribes to the same snapshot channel and can never disagree.

pub mod error;
pub mod events;
pub mod store;
pub mod sync;
pub mod track;
pub mod waveform;

pub use error::{PlayerError, Result};
pub use events::PlayerEvent;
pub use store::PlayerStore;
pub use sync::{attach_synchronizer, SynchronizerHandle};
pub use track::{AudioTrack, PlaybackSnapshot, TrackPatch, TransportState};
pub use waveform::{build_bars, ScrubPhase, SeekController, WaveformBars, WaveformConfig};
