//! Telemetry logger.
//!
//! [`TelemetryLogger`] wraps each accepted event in an envelope and fans the
//! serialized line out to every configured sink.

use std::io;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::error;

use spa_edge_common::TelemetryLogConfig;

use crate::rotate::DailyRotatingSink;
use crate::sink::{FlatFileSink, TelemetrySink, TracingSink};

/// Fan-out logger for accepted telemetry events.
///
/// Each event is recorded as one JSON line of the form
///
/// ```json
/// {"level":"info","telemetry":{...},"timestamp":"2026-08-24T12:00:00.000Z"}
/// ```
///
/// appended to every sink. Sink failures are traced and swallowed; a
/// telemetry request never fails because a log write did.
pub struct TelemetryLogger {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl TelemetryLogger {
    /// Create a logger over an explicit set of sinks.
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self { sinks }
    }

    /// Create the production logger: flat file, daily rotation, and a
    /// console echo.
    pub fn from_config(config: &TelemetryLogConfig) -> io::Result<Self> {
        let flat = Arc::new(FlatFileSink::open(&config.flat_file)?);
        let rotating = Arc::new(DailyRotatingSink::open(
            &config.rotate_dir,
            config.retention_days,
        )?);
        let console = Arc::new(TracingSink::new());

        Ok(Self::new(vec![flat, rotating, console]))
    }

    /// Record one accepted telemetry event.
    ///
    /// The payload is opaque: no schema is enforced and the shape is never
    /// inspected. Exactly one line per call reaches each healthy sink.
    pub fn record(&self, event: &serde_json::Value) {
        let envelope = serde_json::json!({
            "level": "info",
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "telemetry": event,
        });
        let line = envelope.to_string();

        for sink in &self.sinks {
            if let Err(e) = sink.append(&line) {
                error!(error = %e, "Telemetry sink write failed");
            }
        }
    }

    /// Number of configured sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl std::fmt::Debug for TelemetryLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryLogger")
            .field("sink_count", &self.sinks.len())
            .finish_non_exhaustive()
    }
}
