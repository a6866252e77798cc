//! Status data source contract and the dashboard store built on top of it.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Dashboard payload as returned by the status source.
///
/// Only `has_active_generation` is interpreted by this core; the remaining
/// dashboard fields ride along untyped for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// True while background content-generation jobs are in flight.
    pub has_active_generation: bool,
    /// Everything else the dashboard endpoint returns.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DashboardData {
    pub fn new(has_active_generation: bool) -> Self {
        Self {
            has_active_generation,
            extra: serde_json::Map::new(),
        }
    }
}

/// The consumed refetch function: invoked on demand by the poller and by
/// pull-to-refresh.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_dashboard(&self) -> Result<DashboardData>;
}

/// Observable dashboard state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub data: Option<DashboardData>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Holds the most recent dashboard payload and exposes it on a watch
/// channel, one writer shared by pull-to-refresh and the poller.
pub struct DashboardStore<S: StatusSource> {
    source: Arc<S>,
    state_tx: watch::Sender<DashboardState>,
}

impl<S: StatusSource> DashboardStore<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (state_tx, _) = watch::channel(DashboardState::default());
        Self { source, state_tx }
    }

    /// Current state by value.
    pub fn state(&self) -> DashboardState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_tx.subscribe()
    }

    /// Re-fetch the dashboard. Returns the generation flag on success; a
    /// failure records the message and leaves the previous payload in place.
    pub async fn refresh(&self) -> Result<bool> {
        self.state_tx.send_modify(|state| {
            state.is_loading = true;
            state.last_error = None;
        });
        match self.source.fetch_dashboard().await {
            Ok(data) => {
                let has_active_generation = data.has_active_generation;
                debug!(has_active_generation, "dashboard refreshed");
                self.state_tx.send_modify(|state| {
                    state.data = Some(data);
                    state.is_loading = false;
                });
                Ok(has_active_generation)
            }
            Err(e) => {
                self.state_tx.send_modify(|state| {
                    state.is_loading = false;
                    state.last_error = Some(e.to_string());
                });
                Err(e)
            }
        }
    }
}
