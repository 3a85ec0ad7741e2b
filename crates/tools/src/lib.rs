//! Podcast tool implementations for Castwise.
//!
//! Tools give the agent the ability to act: look up a show's feed,
//! transcribe an episode, and hand back the final answer.

pub mod audio_grabber;
pub mod feed_fetcher;
pub mod summarizer;

use castwise_config::AppConfig;
use castwise_core::tool::ToolRegistry;
use std::time::Duration;
use tracing::warn;

pub use audio_grabber::AudioGrabberTool;
pub use feed_fetcher::FeedFetcherTool;
pub use summarizer::SummarizerAnalystTool;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const USER_AGENT: &str = concat!("castwise/", env!("CARGO_PKG_VERSION"));

/// Registry keys the podcast agent dispatches on.
pub const FEED_FETCHER: &str = "feedFetcher";
pub const AUDIO_GRABBER: &str = "audioGrabber";
pub const SUMMARIZER_ANALYST: &str = "summarizerAnalyst";

/// Create the podcast tool registry from configuration.
///
/// Transcription always goes to the `openai` provider entry (or the public
/// OpenAI endpoint), since that is where the Whisper model lives.
pub fn podcast_registry(config: &AppConfig) -> ToolRegistry {
    let client = http_client(
        Duration::from_secs(config.tools.request_timeout_secs),
        USER_AGENT,
    );

    let transcription_base = config
        .providers
        .get("openai")
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| OPENAI_BASE_URL.to_string());

    let mut registry = ToolRegistry::new();
    registry.register(
        FEED_FETCHER,
        Box::new(FeedFetcherTool::new(
            client.clone(),
            &config.tools.search_url,
        )),
    );
    registry.register(
        AUDIO_GRABBER,
        Box::new(AudioGrabberTool::new(
            client,
            &transcription_base,
            config.api_key_for("openai").unwrap_or_default(),
            &config.tools.transcription_model,
            config.tools.max_audio_bytes,
        )),
    );
    registry.register(SUMMARIZER_ANALYST, Box::new(SummarizerAnalystTool));
    registry
}

/// Shared HTTP client for the tools. Falls back to reqwest's defaults,
/// without the timeout or user agent, if the builder rejects the settings.
fn http_client(timeout: Duration, user_agent: &str) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Failed to build tool HTTP client, using defaults without timeout");
            reqwest::Client::new()
        }
    }
}
