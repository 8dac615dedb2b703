//! Observability for Groupscope.
//!
//! - **Logging**: `tracing-subscriber` with JSON or pretty output, see [`logging`]
//! - **Metrics**: counters and histograms through the `metrics` facade, see [`metrics`]
//!
//! Library crates depend on this crate for the metric helpers; only the
//! binary calls [`init_logging`].

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
