//! HTTP handlers for the agent service.

pub mod agent;
pub mod health;
