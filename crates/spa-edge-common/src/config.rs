//! Configuration structures for spa-edge.
//!
//! This module defines configuration options for the server components:
//! - [`EdgeConfig`]: Top-level configuration containing all settings
//! - [`ServerConfig`]: Listener settings (port)
//! - [`SiteConfig`]: Location of the SPA build output
//! - [`RateLimitConfig`]: Telemetry rate-limit window and quota
//! - [`TelemetryLogConfig`]: Telemetry log sink layout and retention
//!
//! All settings have compiled-in defaults; a TOML file named by the
//! `SPA_EDGE_CONFIG` environment variable may override them. There are no
//! command-line arguments.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EdgeError;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_ENV_VAR: &str = "SPA_EDGE_CONFIG";

/// Top-level edge server configuration.
///
/// # Example
///
/// ```toml
/// [server]
/// port = 5100
///
/// [site]
/// dist_dir = "./dist"
///
/// [rate_limit]
/// window_secs = 60
/// max_requests = 10
///
/// [telemetry_log]
/// flat_file = "telemetry.log"
/// rotate_dir = "logs"
/// retention_days = 60
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EdgeConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// SPA build output location.
    #[serde(default)]
    pub site: SiteConfig,

    /// Telemetry rate-limit configuration.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Telemetry log sink configuration.
    #[serde(default)]
    pub telemetry_log: TelemetryLogConfig,
}

impl EdgeConfig {
    /// Load configuration from the environment.
    ///
    /// If `SPA_EDGE_CONFIG` names a TOML file, settings are read from it;
    /// otherwise the compiled-in defaults are used.
    pub fn from_env() -> Result<Self, EdgeError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EdgeError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| EdgeError::ConfigIo {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, EdgeError> {
        toml::from_str(content).map_err(|e| EdgeError::ConfigParse {
            message: e.to_string(),
        })
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listening port. The server binds `0.0.0.0:<port>` once at startup
    /// and exits if the bind fails.
    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::port(),
        }
    }
}

/// SPA build output location.
///
/// The build pipeline (out of scope) produces a directory containing an
/// `assets/` subdirectory with content-hashed filenames and a top-level
/// `index.html` fallback document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Root of the build output.
    #[serde(default = "defaults::dist_dir")]
    pub dist_dir: PathBuf,
}

impl SiteConfig {
    /// Directory of content-hashed static assets.
    pub fn assets_dir(&self) -> PathBuf {
        self.dist_dir.join("assets")
    }

    /// The fallback HTML document served for client-side routes.
    pub fn index_file(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dist_dir: defaults::dist_dir(),
        }
    }
}

/// Telemetry rate-limit configuration.
///
/// A fixed window per client address: at most `max_requests` telemetry
/// requests are accepted within `window_secs` seconds; excess requests are
/// rejected with 429, never queued.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    #[serde(default = "defaults::window_secs")]
    pub window_secs: u64,

    /// Accepted requests per window per client address.
    #[serde(default = "defaults::max_requests")]
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Get the window length as a `Duration`.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: defaults::window_secs(),
            max_requests: defaults::max_requests(),
        }
    }
}

/// Telemetry log sink configuration.
///
/// Accepted telemetry events are appended to two sinks: a flat append-only
/// file and a date-partitioned set of files rotated daily.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryLogConfig {
    /// Flat append-only log file.
    #[serde(default = "defaults::flat_file")]
    pub flat_file: PathBuf,

    /// Directory holding the daily partition files.
    #[serde(default = "defaults::rotate_dir")]
    pub rotate_dir: PathBuf,

    /// Days to retain daily partition files.
    #[serde(default = "defaults::retention_days")]
    pub retention_days: u32,
}

impl Default for TelemetryLogConfig {
    fn default() -> Self {
        Self {
            flat_file: defaults::flat_file(),
            rotate_dir: defaults::rotate_dir(),
            retention_days: defaults::retention_days(),
        }
    }
}

/// Default value functions for serde.
mod defaults {
    use std::path::PathBuf;

    pub const fn port() -> u16 {
        5100
    }

    pub fn dist_dir() -> PathBuf {
        PathBuf::from("./dist")
    }

    pub const fn window_secs() -> u64 {
        60
    }

    pub const fn max_requests() -> u32 {
        10
    }

    pub fn flat_file() -> PathBuf {
        PathBuf::from("telemetry.log")
    }

    pub fn rotate_dir() -> PathBuf {
        PathBuf::from("logs")
    }

    pub const fn retention_days() -> u32 {
        60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EdgeConfig::default();

        assert_eq!(config.server.port, 5100);
        assert_eq!(config.site.dist_dir, PathBuf::from("./dist"));
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.telemetry_log.retention_days, 60);
    }

    #[test]
    fn test_site_paths() {
        let site = SiteConfig {
            dist_dir: PathBuf::from("/srv/app/dist"),
        };

        assert_eq!(site.assets_dir(), PathBuf::from("/srv/app/dist/assets"));
        assert_eq!(site.index_file(), PathBuf::from("/srv/app/dist/index.html"));
    }

    #[test]
    fn test_rate_limit_window() {
        let config = RateLimitConfig {
            window_secs: 5,
            ..Default::default()
        };

        assert_eq!(config.window(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_toml() {
        let config = EdgeConfig::from_toml("[server]\nport = 8080\n").unwrap();

        // Explicitly set value
        assert_eq!(config.server.port, 8080);
        // Default values for unspecified sections
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(
            config.telemetry_log.flat_file,
            PathBuf::from("telemetry.log")
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = EdgeConfig::from_toml("not = [valid").unwrap_err();
        assert!(matches!(err, EdgeError::ConfigParse { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spa-edge.toml");
        std::fs::write(&path, "[rate_limit]\nmax_requests = 3\n").unwrap();

        let config = EdgeConfig::from_file(&path).unwrap();
        assert_eq!(config.rate_limit.max_requests, 3);
    }

    #[test]
    fn test_from_missing_file() {
        let err = EdgeConfig::from_file("/nonexistent/spa-edge.toml").unwrap_err();
        assert!(matches!(err, EdgeError::ConfigIo { .. }));
    }

    #[test]
    fn test_config_serialization() {
        let config = EdgeConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let deserialized = EdgeConfig::from_toml(&toml).unwrap();

        assert_eq!(config.server.port, deserialized.server.port);
        assert_eq!(
            config.rate_limit.window_secs,
            deserialized.rate_limit.window_secs
        );
    }
}
