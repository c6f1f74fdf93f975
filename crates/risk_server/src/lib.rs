//! REST API server for the Monte Carlo risk engine
//!
//! Exposes `POST /api/simulate` over [`risk_engine`], plus health and
//! readiness probes for load balancer integration.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

// Re-export the engine for clients deserialising responses
pub use risk_engine;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
