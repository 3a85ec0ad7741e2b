//! The podcast agent: find a show, transcribe its latest episode, answer
//! questions about it.
//!
//! This is an [`AgentConfig`] over [`PodcastMemory`] plus a thin wrapper
//! that wires it to a provider. All podcast knowledge lives here; the
//! executor stays generic.

use crate::config::AgentConfig;
use crate::executor::{AgentExecutor, DecisionSettings, RunOutcome};
use castwise_config::AppConfig;
use castwise_core::action::ActionRecord;
use castwise_core::error::{Error, Result};
use castwise_core::provider::Provider;
use castwise_core::tool::ToolRegistry;
use castwise_tools::{AUDIO_GRABBER, FEED_FETCHER, SUMMARIZER_ANALYST};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// What the podcast agent has learned so far in a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastMemory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podcast_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podcast_description: Option<String>,

    /// Named after the audio grabber's parameter so the model can copy it across.
    #[serde(rename = "audioURL", default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<String>,
}

/// Build the podcast prompt.
pub fn podcast_prompt(
    objective: &str,
    memory: &PodcastMemory,
    catalog: &str,
    last_action: Option<&ActionRecord>,
) -> String {
    let memory = serde_json::to_string(memory).unwrap_or_else(|_| "{}".into());
    let last_action = ActionRecord::render(last_action);

    format!(
        r#"You are a podcast agent designed to help users find and fetch podcast information. You can find the latest episode of a podcast show by its name, get its transcription, and answer questions about the podcast.
Objective: {objective}
Current Memory: {memory}
Available Tools:
{catalog}
Last Action:
{last_action}

Based on the objective, the current memory and the last action, decide the next action.
Respond with a JSON object containing "tool" (the name of the tool as listed above), "params" (parameters for the tool) and "reasoning" (why this tool helps).
Example Response:
{{
  "tool": "tool_name",
  "params": {{
    "showName": "first_argument_to_tool"
  }},
  "reasoning": "I need to use this tool because it will help me achieve the objective."
}}
Respond STRICTLY with this JSON format only, without any additional text or surrounding formatting."#
    )
}

/// Fold a tool result into podcast memory.
///
/// Only results from the three podcast tools are kept. A `null` or empty
/// result, or a result from any other key, leaves memory as it was. Feed
/// fields are applied one by one, so a missing field never erases a value
/// found earlier.
pub fn update_podcast_memory(tool: &str, result: &Value, memory: &PodcastMemory) -> PodcastMemory {
    let mut next = memory.clone();

    match tool {
        FEED_FETCHER => {
            let Value::Object(feed) = result else {
                return next;
            };
            if let Some(name) = text(feed.get("title")) {
                next.podcast_name = Some(name);
            }
            if let Some(description) = text(feed.get("description")) {
                next.podcast_description = Some(description);
            }
            let audio_url = feed
                .get("latestEpisode")
                .and_then(|episode| episode.get("audioUrl"));
            if let Some(url) = text(audio_url) {
                next.audio_url = Some(url);
            }
        }
        AUDIO_GRABBER => {
            if let Some(transcript) = text(Some(result)) {
                next.transcript = Some(transcript);
            }
        }
        SUMMARIZER_ANALYST => {
            if let Some(answer) = text(Some(result)) {
                next.final_answer = Some(answer);
            }
        }
        _ => {}
    }

    next
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The agent configuration for the podcast domain.
pub fn podcast_config(tools: ToolRegistry) -> Result<AgentConfig<PodcastMemory>> {
    AgentConfig::new(
        tools,
        PodcastMemory::default(),
        podcast_prompt,
        update_podcast_memory,
        |memory: &PodcastMemory| memory.final_answer.is_some(),
    )
}

/// A ready-to-run podcast agent.
pub struct PodcastAgent {
    executor: AgentExecutor<PodcastMemory>,
}

impl PodcastAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: ToolRegistry,
        settings: DecisionSettings,
        max_actions: u32,
    ) -> Result<Self> {
        let config = podcast_config(tools)?.with_max_actions(max_actions);
        Ok(Self {
            executor: AgentExecutor::new(provider, config).with_settings(settings),
        })
    }

    /// Build the agent from application config: default provider, podcast
    /// tools, configured model and budget.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let router = castwise_providers::router::build_from_config(config);
        let provider = router.default().ok_or_else(|| Error::Config {
            message: format!("provider '{}' is not available", config.default_provider),
        })?;

        Self::new(
            provider,
            castwise_tools::podcast_registry(config),
            DecisionSettings::from_config(config),
            config.agent.max_actions,
        )
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.executor.config().tools()
    }

    /// Run the agent and return the full outcome.
    pub async fn run(&self, objective: &str) -> RunOutcome<PodcastMemory> {
        self.executor.run(objective).await
    }

    /// Run the agent and return only its final answer, if it produced one.
    pub async fn answer(&self, objective: &str) -> Option<String> {
        self.run(objective).await.memory.final_answer
    }
}
