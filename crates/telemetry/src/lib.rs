//! Internal telemetry for the contact relay.
//!
//! In-process counters and health state only; the service is small enough
//! that an external metrics system would outweigh it.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
