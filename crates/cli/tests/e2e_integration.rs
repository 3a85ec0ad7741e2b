//! End-to-end integration tests for the Castwise agent.
//!
//! These tests drive the public crates together: the generic executor,
//! the podcast configuration and the real podcast tools that run without
//! network access.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use castwise_agent::{
    AgentConfig, AgentExecutor, DecisionSettings, LoopState, PodcastAgent, podcast_config,
};
use castwise_core::action::{ActionOutcome, ActionRecord};
use castwise_core::error::{DecisionError, ProviderError, ToolError};
use castwise_core::message::Message;
use castwise_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use castwise_core::tool::{Tool, ToolParams, ToolRegistry};
use castwise_tools::{AudioGrabberTool, SummarizerAnalystTool};
use serde_json::{Value, json};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted completions in sequence and
/// remembers every prompt it was shown.
struct ScriptedProvider {
    responses: std::sync::Mutex<Vec<String>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let index = prompts.len();
        prompts.push(request.messages[0].content.clone());

        let Some(text) = responses.get(index) else {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("ScriptedProvider exhausted: call #{index}"),
            });
        };

        Ok(ProviderResponse {
            message: Message::assistant(text.as_str()),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "e2e-mock".into(),
        })
    }
}

// ── Test tools ───────────────────────────────────────────────────────────

/// Returns a fixed string and counts its executions.
struct FixedTool {
    name: &'static str,
    output: &'static str,
    calls: Arc<AtomicUsize>,
}

impl FixedTool {
    fn new(name: &'static str, output: &'static str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                output,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait::async_trait]
impl Tool for FixedTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Returns a fixed value."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {"query": {"type": "string"}}})
    }

    async fn execute(&self, _params: ToolParams) -> Result<Value, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Value::String(self.output.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AnswerMemory {
    answer: Option<String>,
}

fn answer_config(registry: ToolRegistry, budget: u32) -> AgentConfig<AnswerMemory> {
    AgentConfig::new(
        registry,
        AnswerMemory::default(),
        |objective: &str, memory: &AnswerMemory, catalog: &str, last: Option<&ActionRecord>| {
            format!(
                "Objective: {objective}\nAnswer so far: {:?}\nTools:\n{catalog}\nLast:\n{}",
                memory.answer,
                ActionRecord::render(last)
            )
        },
        |tool: &str, result: &Value, memory: &AnswerMemory| {
            if tool == "finish" {
                AnswerMemory {
                    answer: result.as_str().map(str::to_string),
                }
            } else {
                memory.clone()
            }
        },
        |memory: &AnswerMemory| memory.answer.is_some(),
    )
    .unwrap()
    .with_max_actions(budget)
}

// ── Generic executor ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_lookup_then_finish() {
    let provider = Arc::new(ScriptedProvider::new(&[
        r#"{"tool": "lookup", "params": {"query": "x"}}"#,
        r#"{"tool": "finish", "params": {"answer": "42"}}"#,
    ]));
    let (lookup, lookups) = FixedTool::new("lookup", "42");
    let (finish, finishes) = FixedTool::new("finish", "42");
    let mut registry = ToolRegistry::new();
    registry.register("lookup", Box::new(lookup));
    registry.register("finish", Box::new(finish));

    let executor = AgentExecutor::new(provider.clone(), answer_config(registry, 3));
    let outcome = executor.run("find x").await;

    assert!(matches!(outcome.state, LoopState::Completed));
    assert_eq!(outcome.memory.answer.as_deref(), Some("42"));
    assert_eq!(outcome.actions_taken, 2);
    assert_eq!(provider.calls(), 2);
    assert_eq!(lookups.load(Ordering::SeqCst), 1);
    assert_eq!(finishes.load(Ordering::SeqCst), 1);

    assert!(provider.prompt(0).contains("Last:\nNo previous action."));
    assert!(provider.prompt(1).contains("Tool: lookup"));
    assert!(provider.prompt(1).contains("Result: 42"));
    assert!(outcome.finished_at >= outcome.started_at);
    assert!(outcome.duration_ms() >= 0);
}

#[tokio::test]
async fn e2e_chatty_model_is_aborted_not_retried() {
    let provider = Arc::new(ScriptedProvider::new(&[
        "Sure! I'd love to help you find x.",
        r#"{"tool": "finish", "params": {}}"#,
    ]));
    let (finish, finishes) = FixedTool::new("finish", "42");
    let mut registry = ToolRegistry::new();
    registry.register("finish", Box::new(finish));

    let outcome = AgentExecutor::new(provider.clone(), answer_config(registry, 3))
        .run("find x")
        .await;

    assert!(matches!(
        outcome.state,
        LoopState::Aborted(DecisionError::Malformed { .. })
    ));
    assert_eq!(outcome.memory, AnswerMemory::default());
    assert_eq!(provider.calls(), 1);
    assert_eq!(finishes.load(Ordering::SeqCst), 0);
}

// ── Podcast agent with real tools ────────────────────────────────────────

fn podcast_tools() -> ToolRegistry {
    let mut config = castwise_config::AppConfig::default();
    config.api_key = None;
    castwise_tools::podcast_registry(&config)
}

#[tokio::test]
async fn e2e_podcast_recovers_from_tool_error() {
    // The first action omits the required parameter; the model then sees
    // the error and supplies the final answer properly.
    let provider = Arc::new(ScriptedProvider::new(&[
        r#"{"tool": "summarizerAnalyst", "params": {}, "reasoning": "ready"}"#,
        "```json\n{\"tool\": \"summarizerAnalyst\", \"params\": {\"finalAnswer\": \"The episode is about AI chips.\"}}\n```",
    ]));
    let agent = PodcastAgent::new(
        provider.clone(),
        podcast_tools(),
        DecisionSettings::default(),
        5,
    )
    .unwrap();

    let outcome = agent.run("What is the latest Hard Fork episode about?").await;

    assert!(matches!(outcome.state, LoopState::Completed));
    assert_eq!(outcome.actions_taken, 2);
    assert_eq!(
        outcome.memory.final_answer.as_deref(),
        Some("The episode is about AI chips.")
    );
    let second_prompt = provider.prompt(1);
    assert!(second_prompt.contains("Tool: summarizerAnalyst"));
    assert!(second_prompt.contains(
        "Result: Error: Invalid tool arguments: Missing 'finalAnswer' argument"
    ));
}

#[tokio::test]
async fn e2e_podcast_audio_grabber_failure_is_absorbed() {
    // No API key is configured, so transcription fails inside the tool.
    let mut tools = ToolRegistry::new();
    tools.register(
        castwise_tools::AUDIO_GRABBER,
        Box::new(AudioGrabberTool::new(
            reqwest::Client::new(),
            "https://api.openai.com/v1",
            "",
            "whisper-1",
            1024,
        )),
    );
    tools.register(
        castwise_tools::SUMMARIZER_ANALYST,
        Box::new(SummarizerAnalystTool),
    );
    let provider = Arc::new(ScriptedProvider::new(&[
        r#"{"tool": "audioGrabber", "params": {"audioURL": "https://cdn.example.com/ep.mp3"}}"#,
        r#"{"tool": "summarizerAnalyst", "params": {"finalAnswer": "Transcription is unavailable."}}"#,
    ]));
    let agent = PodcastAgent::new(provider.clone(), tools, DecisionSettings::default(), 5).unwrap();

    let outcome = agent.run("Transcribe the episode").await;

    assert!(outcome.is_completed());
    assert!(outcome.memory.transcript.is_none());
    assert!(provider.prompt(1).contains("No API key configured for transcription"));
}

#[tokio::test]
async fn e2e_podcast_unknown_tool_aborts() {
    let provider = Arc::new(ScriptedProvider::new(&[
        r#"{"tool": "webSearch", "params": {"query": "hard fork"}}"#,
    ]));
    let agent = PodcastAgent::new(
        provider.clone(),
        podcast_tools(),
        DecisionSettings::default(),
        5,
    )
    .unwrap();

    let outcome = agent.run("Find Hard Fork").await;

    match &outcome.state {
        LoopState::Aborted(DecisionError::UnknownTool { name }) => assert_eq!(name, "webSearch"),
        other => panic!("unexpected state: {other:?}"),
    }
    let last = outcome.last_action.unwrap();
    assert!(matches!(last.outcome, ActionOutcome::Unresolved { .. }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn e2e_podcast_budget_exhaustion() {
    let ask = r#"{"tool": "summarizerAnalyst", "params": {"finalAnswer": ""}}"#;
    let provider = Arc::new(ScriptedProvider::new(&[ask, ask, ask, ask]));
    let agent =
        PodcastAgent::new(provider.clone(), podcast_tools(), DecisionSettings::default(), 3)
            .unwrap();

    let outcome = agent.run("anything").await;

    assert!(matches!(outcome.state, LoopState::Exhausted));
    assert_eq!(outcome.actions_taken, 3);
    assert_eq!(provider.calls(), 3);
    assert!(agent.answer("anything").await.is_none());
}

#[test]
fn e2e_podcast_catalog_is_stable() {
    let first = podcast_tools().catalog();
    let second = podcast_tools().catalog();
    assert_eq!(first, second);

    let config = podcast_config(podcast_tools()).unwrap();
    assert_eq!(
        config.tools().keys(),
        vec!["audioGrabber", "feedFetcher", "summarizerAnalyst"]
    );
}
