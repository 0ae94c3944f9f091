//! Telemetry log pipeline for spa-edge.
//!
//! Accepted telemetry events are opaque JSON payloads. This crate wraps each
//! one in an envelope and appends it, as a single JSON line, to a set of
//! sinks:
//!
//! - [`FlatFileSink`]: one append-only file (`telemetry.log`)
//! - [`DailyRotatingSink`]: date-partitioned files rotated daily, pruned
//!   after a retention period
//! - [`TracingSink`]: an echo of every line onto the console through the
//!   `tracing` pipeline
//!
//! The pipeline is an explicit component injected into the telemetry
//! handler at construction time, not a process-wide singleton, so tests can
//! substitute an in-memory sink ([`MemorySink`]).
//!
//! Concurrent appends are line-atomic: each sink serializes writers and
//! writes a full line at a time, so interleaved requests never corrupt the
//! log.

pub mod logger;
pub mod rotate;
pub mod sink;

pub use logger::TelemetryLogger;
pub use rotate::DailyRotatingSink;
pub use sink::{FlatFileSink, MemorySink, TelemetrySink, TracingSink};
