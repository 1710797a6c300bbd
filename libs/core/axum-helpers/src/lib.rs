//! # Axum Helpers
//!
//! Shared utilities for building Axum web services:
//!
//! - **[`errors`]**: Structured error responses ([`AppError`], [`ErrorResponse`])
//! - **[`health`]**: Liveness endpoint wired to [`core_config::AppInfo`]
//! - **[`shutdown`]**: Graceful shutdown signal handling

pub mod errors;
pub mod health;
pub mod shutdown;

pub use errors::{AppError, ErrorResponse, not_found};
pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;
