//! # Core Runtime
//!
//! Foundational infrastructure shared by the client core crates:
//! - Logging and tracing configuration
//!
//! This crate establishes the logging conventions used throughout the
//! system. Application entry points call [`logging::init_logging`] once at
//! startup; library crates only ever use the `tracing` macros.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
