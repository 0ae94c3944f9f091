//! Shared application state.
//!
//! This module provides [`AppState`], which holds the resources shared
//! across all HTTP request handlers: the telemetry logger, the rate-limit
//! counter table, and the resolved site paths.

use std::path::PathBuf;
use std::sync::Arc;

use spa_edge_common::{EdgeConfig, EdgeError, SiteConfig};
use spa_edge_limiter::FixedWindowLimiter;
use spa_edge_telemetry::TelemetryLogger;

/// Shared state across all request handlers.
///
/// This struct is cloned for each request, so it uses `Arc` for shared data.
/// Both the logger and the limiter are explicit, injectable components: the
/// production constructor wires the file sinks and the configured window,
/// while tests substitute in-memory sinks and small windows.
#[derive(Clone)]
pub struct AppState {
    /// Telemetry log pipeline (flat file + daily rotation in production).
    logger: Arc<TelemetryLogger>,

    /// Per-address telemetry rate limiter.
    limiter: Arc<FixedWindowLimiter>,

    /// Directory of content-hashed static assets.
    assets_dir: PathBuf,

    /// The SPA fallback document.
    index_file: PathBuf,
}

impl AppState {
    /// Create the production state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the telemetry log sinks cannot be opened.
    pub fn new(config: &EdgeConfig) -> Result<Self, EdgeError> {
        let logger = TelemetryLogger::from_config(&config.telemetry_log)?;
        let limiter = FixedWindowLimiter::new(
            config.rate_limit.window(),
            config.rate_limit.max_requests,
        );

        Ok(Self::with_parts(logger, limiter, &config.site))
    }

    /// Assemble state from explicit components.
    pub fn with_parts(
        logger: TelemetryLogger,
        limiter: FixedWindowLimiter,
        site: &SiteConfig,
    ) -> Self {
        Self {
            logger: Arc::new(logger),
            limiter: Arc::new(limiter),
            assets_dir: site.assets_dir(),
            index_file: site.index_file(),
        }
    }

    /// Get the telemetry logger.
    pub fn logger(&self) -> &TelemetryLogger {
        &self.logger
    }

    /// Get the rate limiter.
    pub fn limiter(&self) -> &FixedWindowLimiter {
        &self.limiter
    }

    /// Get the static assets directory.
    pub fn assets_dir(&self) -> &PathBuf {
        &self.assets_dir
    }

    /// Get the fallback document path.
    pub fn index_file(&self) -> &PathBuf {
        &self.index_file
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("assets_dir", &self.assets_dir)
            .field("index_file", &self.index_file)
            .finish_non_exhaustive()
    }
}
