//! service-core: shared infrastructure for the agent services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
