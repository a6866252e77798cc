//! # Media Bridge
//!
//! Contracts between the playback core and the host platform's media
//! transport engine. The engine is a black box owned by the host (native
//! audio session, system media service, etc.); this crate only pins down the
//! async command surface and the event stream the core consumes.
//!
//! Host applications provide a concrete [`MediaEngine`] implementation that
//! satisfies their platform constraints; the core never assumes anything
//! about the transport beyond this contract.

pub mod engine;
pub mod error;

pub use engine::{EngineEvent, EngineState, EnqueueRequest, MediaEngine};
pub use error::{BridgeError, Result};
