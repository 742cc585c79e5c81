pub mod database;
pub mod metrics;
pub mod providers;
pub mod relay;

pub use database::AgentDb;
pub use relay::AgentRelay;
