//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly with OpenAPI documentation
//! - Health and readiness endpoints
//! - Graceful shutdown: SIGTERM/SIGINT stops the listener, in-flight
//!   requests drain, then connection cleanup runs under a timeout

pub mod app;
pub mod health;

pub use app::{create_app, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
