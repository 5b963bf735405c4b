//! # chainstream-observability
//!
//! Structured logging for chainstream binaries. Libraries in the workspace
//! only emit `tracing` events; a binary calls [`init_tracing`] once.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
