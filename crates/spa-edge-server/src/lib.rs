//! HTTP server for spa-edge.
//!
//! This crate provides the HTTP surface of the edge server. It handles:
//!
//! - Telemetry intake (`POST /telemetry`), rate-limited per client address
//! - Static asset serving under `/assets` with immutable cache headers
//! - The SPA fallback document for every other path
//! - Cross-cutting response policy (frame denial, no server banner, gzip)
//!
//! # Quick Start
//!
//! ```ignore
//! use spa_edge_common::EdgeConfig;
//! use spa_edge_server::EdgeServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EdgeConfig::default();
//!     let server = EdgeServer::new(&config)?;
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use router::build_router;
pub use server::{EdgeServer, TestHandle};
pub use state::AppState;
