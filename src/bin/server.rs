use ng_chat::core::ServerConfig;
use ng_chat::gateway;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ng_chat=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    gateway::serve(config).await?;
    Ok(())
}
