//! `castwise gateway`: start the HTTP front door.

use castwise_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Castwise Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   CORS origins: {}", config.gateway.allowed_origins.join(", "));

    castwise_gateway::start(config).await?;

    Ok(())
}
