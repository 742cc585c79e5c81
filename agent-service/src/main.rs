use agent_service::config::AgentConfig;
use agent_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AgentConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("agent-service", "info", config.otlp_endpoint.as_deref());

    let app = Application::build(config.clone()).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    tracing::info!(
        address = %config.common.address(),
        port = app.port(),
        ai_provider_configured = config.gemini.is_configured(),
        store_connected = app.state().relay.health().services.store,
        "Agent server running"
    );

    app.run_until_stopped().await?;

    Ok(())
}
