//! Focus-aware generation poller.
//!
//! While the dashboard screen is focused and `hasActiveGeneration` is true,
//! a background task re-fetches the dashboard on a fixed interval. The
//! interval exists only when both conditions hold: losing focus or the flag
//! going false tears the task down in the same tick, so a backgrounded
//! screen never keeps polling.

use crate::status::{DashboardStore, StatusSource};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default re-fetch cadence while generation is active.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Snapshot of the poller's control state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationPollState {
    pub is_focused: bool,
    pub is_generating: bool,
    pub is_polling: bool,
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct PollerInner {
    focused: bool,
    generating: bool,
    task: Option<PollTask>,
}

/// Drives periodic dashboard refreshes while generation is in flight.
///
/// The poll task holds only a [`Weak`] reference back to the poller, so an
/// orphaned task can never keep the poller alive.
pub struct GenerationPoller<S: StatusSource + 'static> {
    store: Arc<DashboardStore<S>>,
    config: PollerConfig,
    inner: Mutex<PollerInner>,
    weak: Weak<Self>,
}

impl<S: StatusSource + 'static> GenerationPoller<S> {
    pub fn new(store: Arc<DashboardStore<S>>, config: PollerConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            store,
            config,
            inner: Mutex::new(PollerInner {
                focused: false,
                generating: false,
                task: None,
            }),
            weak: weak.clone(),
        })
    }

    pub fn state(&self) -> GenerationPollState {
        let inner = self.inner.lock();
        GenerationPollState {
            is_focused: inner.focused,
            is_generating: inner.generating,
            is_polling: inner.task.is_some(),
        }
    }

    /// The owning screen gained focus.
    pub fn handle_focus(&self) {
        let mut inner = self.inner.lock();
        inner.focused = true;
        self.reconcile(&mut inner);
    }

    /// The owning screen lost focus. Any running interval stops now, not
    /// at its next tick.
    pub fn handle_blur(&self) {
        let mut inner = self.inner.lock();
        inner.focused = false;
        self.reconcile(&mut inner);
    }

    /// Record whether generation jobs are in flight, usually taken from the
    /// latest dashboard payload.
    pub fn set_generation_flag(&self, generating: bool) {
        let mut inner = self.inner.lock();
        inner.generating = generating;
        self.reconcile(&mut inner);
    }

    fn reconcile(&self, inner: &mut PollerInner) {
        let should_poll = inner.focused && inner.generating;
        if should_poll && inner.task.is_none() {
            self.spawn_task(inner);
        } else if !should_poll && inner.task.is_some() {
            Self::stop_task(inner);
        }
    }

    fn spawn_task(&self, inner: &mut PollerInner) {
        let cancel = CancellationToken::new();
        let cancelled = cancel.clone();
        let store = Arc::clone(&self.store);
        let weak = self.weak.clone();
        let interval = self.config.interval;
        debug!(interval_secs = interval.as_secs(), "generation poll started");
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
                match store.refresh().await {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("generation finished, stopping poll");
                        if let Some(poller) = weak.upgrade() {
                            poller.set_generation_flag(false);
                        }
                        break;
                    }
                    // Transient fetch failures keep the interval alive.
                    Err(e) => warn!(error = %e, "generation poll fetch failed"),
                }
            }
        });
        inner.task = Some(PollTask { cancel, handle });
    }

    fn stop_task(inner: &mut PollerInner) {
        if let Some(task) = inner.task.take() {
            task.cancel.cancel();
            task.handle.abort();
            debug!("generation poll stopped");
        }
    }
}

impl<S: StatusSource + 'static> Drop for GenerationPoller<S> {
    fn drop(&mut self) {
        Self::stop_task(&mut self.inner.lock());
    }
}
