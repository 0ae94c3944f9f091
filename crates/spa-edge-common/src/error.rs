//! Error types for spa-edge.
//!
//! This module defines [`EdgeError`], the top-level error type for the
//! server. Request-level failures (missing asset, malformed telemetry body,
//! rate-limit rejection) are plain HTTP status codes and never pass through
//! this type; `EdgeError` covers startup and configuration failures, which
//! are fatal.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Top-level errors for the edge server.
#[derive(Error, Debug)]
pub enum EdgeError {
    /// The listening socket could not be bound.
    ///
    /// This is fatal: the process exits non-zero with no retry. Restart
    /// policy is left to an external process manager.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// The underlying socket error.
        #[source]
        source: io::Error,
    },

    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ConfigIo {
        /// Path of the file that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config file: {message}")]
    ConfigParse {
        /// Description of the parse failure.
        message: String,
    },

    /// Invalid configuration was provided.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl EdgeError {
    /// Create a new `Bind` error.
    pub fn bind(addr: SocketAddr, source: io::Error) -> Self {
        Self::Bind { addr, source }
    }

    /// Create a new `InvalidConfig` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error is a startup bind failure.
    pub fn is_bind(&self) -> bool {
        matches!(self, Self::Bind { .. })
    }
}
