//! `castwise tools`: show the tool catalog exactly as the model sees it.

use castwise_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = castwise_tools::podcast_registry(&config);

    println!("{} tools registered:\n", registry.len());
    for (key, descriptor) in registry.descriptors() {
        println!("  {key:<20} ({})", descriptor.name);
    }

    println!("\nCatalog:\n");
    println!("{}", registry.catalog());

    Ok(())
}
