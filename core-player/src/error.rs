//! Error types for the playback core.

use thiserror::Error;

/// Errors surfaced by playback operations.
///
/// Only the track-load path propagates errors to callers; transport commands
/// absorb their failures (logged, snapshot unchanged) because a single
/// rejected command must never strand the player.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// The media engine rejected an initialize or enqueue call.
    #[error("Engine bridge error: {0}")]
    Bridge(#[from] media_bridge::BridgeError),
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
