//! Castwise CLI: the main entry point.
//!
//! Commands:
//! - `run`      : run the podcast agent for one objective
//! - `gateway`  : start the HTTP front door
//! - `onboard`  : write the default config file
//! - `tools`    : print the tool catalog the model sees

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "castwise",
    about = "Castwise: an LLM-driven podcast agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "CASTWISE_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent once and print its final answer
    Run {
        /// What the agent should achieve, e.g. "Summarize the latest Hard Fork episode"
        objective: String,

        /// Override the action budget for this run
        #[arg(long)]
        max_actions: Option<u32>,
    },

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Initialize configuration
    Onboard,

    /// List the tools available to the agent
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Run {
            objective,
            max_actions,
        } => commands::run::run(objective, max_actions).await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Tools => commands::tools::run().await?,
    }

    Ok(())
}
