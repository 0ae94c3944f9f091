//! Common types, errors, and utilities for spa-edge.
//!
//! This crate provides shared functionality used across the spa-edge workspace:
//! - Error types using `thiserror` for type-safe error handling
//! - Configuration structures for server, site, rate-limit, and log settings

pub mod config;
pub mod error;

pub use config::{EdgeConfig, RateLimitConfig, ServerConfig, SiteConfig, TelemetryLogConfig};
pub use error::EdgeError;
