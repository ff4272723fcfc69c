//! Diagnostics output for the injected wallet connector.
//!
//! The connector only emits `tracing` events; hosts that do not install
//! their own subscriber can use [`init_tracing`] to print them.

pub mod tracing;

pub use crate::tracing::{init_tracing, TracingConfig};
