//! Per-address fixed-window rate limiting.
//!
//! This crate provides [`FixedWindowLimiter`], the counter table that guards
//! the telemetry intake endpoint. It is an explicit, injectable component so
//! it can be unit-tested independently of the HTTP layer.
//!
//! Semantics:
//!
//! - A window starts on the first request from an address and lasts a fixed
//!   duration (60 seconds in production).
//! - At most `max_requests` requests are allowed per window; further
//!   requests are rejected, not queued.
//! - A window that has fully elapsed is replaced by a fresh one on the next
//!   request, so a quiet address gets its full quota back.
//! - Idle entries are garbage-collected opportunistically.

pub mod window;

pub use window::{Decision, FixedWindowLimiter};
