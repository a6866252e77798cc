//! # Dashboard & Generation Polling
//!
//! Consumes the status/generation data source: a refetch call returning the
//! dashboard payload plus one interpreted boolean, `hasActiveGeneration`.
//! While that flag is true and the owning screen is focused, the
//! [`poller::GenerationPoller`] re-fetches on a fixed interval; focus loss
//! always tears the interval down in the same tick.

pub mod error;
pub mod poller;
pub mod status;

pub use error::{DashboardError, Result};
pub use poller::{GenerationPollState, GenerationPoller, PollerConfig};
pub use status::{DashboardData, DashboardState, DashboardStore, StatusSource};
