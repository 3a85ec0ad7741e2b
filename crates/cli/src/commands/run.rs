//! `castwise run`: one-shot agent run from the terminal.

use castwise_agent::{LoopState, PodcastAgent};
use castwise_config::AppConfig;

pub async fn run(
    objective: String,
    max_actions: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(max_actions) = max_actions {
        config.agent.max_actions = max_actions;
        config.validate()?;
    }

    // Check for API key early: give a clear error
    if config.default_provider != "ollama" && config.api_key_for(&config.default_provider).is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    CASTWISE_API_KEY=sk-...   (generic)");
        eprintln!("    OPENAI_API_KEY=sk-...     (OpenAI direct)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let agent = PodcastAgent::from_config(&config)?;
    let outcome = agent.run(&objective).await;

    match (&outcome.state, outcome.memory.final_answer.as_deref()) {
        (LoopState::Aborted(e), _) => {
            return Err(format!(
                "Agent run aborted after {} action(s): {e}",
                outcome.actions_taken
            )
            .into());
        }
        (_, Some(answer)) => println!("{answer}"),
        (state, None) => {
            println!(
                "No answer: run {} after {} action(s).",
                state.label(),
                outcome.actions_taken
            );
            if let Some(last) = &outcome.last_action {
                println!("Last action: {} -> {}", last.tool_name, last.result_text());
            }
        }
    }

    Ok(())
}
