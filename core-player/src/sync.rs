//! # Event Synchronizer
//!
//! Folds the engine's notification stream into the playback store. Attached
//! exactly once at application start; the returned handle is the explicit
//! unsubscribe and is held until process end.
//!
//! Events are applied strictly in delivery order with no reordering or
//! buffering. This task is the only writer of the playing/paused distinction
//! in the snapshot; command handlers never set it, which keeps a single
//! source of truth for transport transitions.

use crate::store::PlayerStore;
use media_bridge::MediaEngine;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Disposal handle for the synchronizer task. Aborts the task when dropped
/// or when [`SynchronizerHandle::detach`] is called.
pub struct SynchronizerHandle {
    task: Option<JoinHandle<()>>,
}

impl SynchronizerHandle {
    /// Stop folding engine events. After this returns, emitted events no
    /// longer reach the store.
    pub fn detach(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("engine event synchronizer detached");
        }
    }
}

impl Drop for SynchronizerHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Subscribe to the store's engine and spawn the folding task.
pub fn attach_synchronizer<E>(store: Arc<PlayerStore<E>>) -> SynchronizerHandle
where
    E: MediaEngine + 'static,
{
    let mut events = store.engine().subscribe();
    let task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => store.apply_engine_event(event),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "engine event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
    SynchronizerHandle { task: Some(task) }
}
