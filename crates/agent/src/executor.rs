//! The decision loop.
//!
//! Each iteration evaluates the done-predicate and the action budget,
//! asks the reasoning service for the next action, dispatches it to the
//! matching tool and folds the result into memory:
//!
//! ```text
//! Evaluating ──► Deciding ──► Executing ──► Evaluating ...
//!     │              │            │
//!     ├─► Completed  └─► Aborted  └─► Aborted (unknown tool)
//!     └─► Exhausted
//! ```
//!
//! Decision failures (service error, empty or malformed output, unknown
//! tool) abort the run. Tool failures never do: the error is recorded in
//! the action record and the model sees it on the next iteration.

use crate::config::AgentConfig;
use crate::decision::{ActionProposal, parse_action};
use castwise_core::action::ActionRecord;
use castwise_core::error::DecisionError;
use castwise_core::message::Message;
use castwise_core::provider::{Provider, ProviderRequest};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Sampling parameters for every decision of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for DecisionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".into(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl DecisionSettings {
    /// Settings for the configured default provider. A `default_model` in
    /// that provider's section takes precedence over the top-level one.
    pub fn from_config(config: &castwise_config::AppConfig) -> Self {
        let model = config
            .providers
            .get(&config.default_provider)
            .and_then(|provider| provider.default_model.clone())
            .unwrap_or_else(|| config.default_model.clone());

        Self {
            model,
            temperature: config.default_temperature,
            max_tokens: config.default_max_tokens,
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone)]
pub enum LoopState {
    /// The done-predicate held.
    Completed,
    /// The action budget ran out first.
    Exhausted,
    /// A decision step failed; no further actions were attempted.
    Aborted(DecisionError),
}

impl LoopState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Exhausted => "exhausted",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct RunOutcome<M> {
    pub run_id: Uuid,
    pub memory: M,
    pub state: LoopState,
    /// Decision attempts made, including one that aborted.
    pub actions_taken: u32,
    pub last_action: Option<ActionRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl<M> RunOutcome<M> {
    pub fn is_completed(&self) -> bool {
        matches!(self.state, LoopState::Completed)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Drives one [`AgentConfig`] against a reasoning service.
///
/// Holds no per-run state. Concurrent calls to [`AgentExecutor::run`] each
/// get their own memory, counter and action record.
pub struct AgentExecutor<M> {
    provider: Arc<dyn Provider>,
    config: Arc<AgentConfig<M>>,
    settings: DecisionSettings,
}

impl<M: Clone> AgentExecutor<M> {
    pub fn new(provider: Arc<dyn Provider>, config: AgentConfig<M>) -> Self {
        Self {
            provider,
            config: Arc::new(config),
            settings: DecisionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DecisionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(&self) -> &AgentConfig<M> {
        &self.config
    }

    pub fn settings(&self) -> &DecisionSettings {
        &self.settings
    }

    /// Run the loop for `objective` until it completes, exhausts its
    /// budget, or aborts.
    pub async fn run(&self, objective: &str) -> RunOutcome<M> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let budget = self.config.max_actions();
        let catalog = self.config.tools().catalog();

        let mut memory = self.config.initial_memory();
        let mut actions_taken: u32 = 0;
        let mut last_action: Option<ActionRecord> = None;

        info!(run_id = %run_id, budget, objective = %objective, "Agent run started");

        let state = loop {
            if self.config.is_done(&memory) {
                break LoopState::Completed;
            }
            if actions_taken >= budget {
                warn!(run_id = %run_id, budget, "Action budget exhausted");
                break LoopState::Exhausted;
            }
            actions_taken += 1;
            debug!(run_id = %run_id, action = actions_taken, "Deciding next action");

            let prompt =
                self.config
                    .build_prompt(objective, &memory, &catalog, last_action.as_ref());

            let proposal = match self.decide(run_id, prompt).await {
                Ok(proposal) => proposal,
                Err(err) => {
                    if matches!(err, DecisionError::MissingTool) {
                        last_action = Some(ActionRecord::unresolved(
                            None,
                            "The response did not name a tool.",
                        ));
                    }
                    warn!(run_id = %run_id, action = actions_taken, error = %err, "Decision failed, aborting run");
                    break LoopState::Aborted(err);
                }
            };

            let ActionProposal {
                tool: key, params, ..
            } = proposal;

            let Some(tool) = self.config.tools().get(&key) else {
                warn!(run_id = %run_id, tool = %key, "Model chose an unknown tool, aborting run");
                last_action = Some(ActionRecord::unresolved(
                    Some(&key),
                    "No tool is registered under this name.",
                ));
                break LoopState::Aborted(DecisionError::UnknownTool { name: key });
            };

            debug!(run_id = %run_id, tool = %key, params = %serde_json::Value::Object(params.clone()), "Executing tool");

            last_action = Some(match tool.execute(params.clone()).await {
                Ok(result) => {
                    memory = self.config.update_memory(&key, &result, &memory);
                    debug!(run_id = %run_id, tool = %key, "Tool succeeded");
                    ActionRecord::succeeded(key, params, result)
                }
                Err(e) => {
                    warn!(run_id = %run_id, tool = %key, error = %e, "Tool execution failed");
                    ActionRecord::failed(key, params, e.to_string())
                }
            });
        };

        let outcome = RunOutcome {
            run_id,
            memory,
            state,
            actions_taken,
            last_action,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            run_id = %run_id,
            state = outcome.state.label(),
            actions = outcome.actions_taken,
            elapsed_ms = outcome.duration_ms(),
            "Agent run finished"
        );

        outcome
    }

    async fn decide(&self, run_id: Uuid, prompt: String) -> Result<ActionProposal, DecisionError> {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.settings.temperature,
            max_tokens: Some(self.settings.max_tokens),
        };

        let response = self.provider.complete(request).await?;
        debug!(run_id = %run_id, raw = %response.message.content, "Raw decision");

        let proposal = parse_action(&response.message.content)?;
        if let Some(reasoning) = &proposal.reasoning {
            debug!(run_id = %run_id, tool = %proposal.tool, reasoning = %reasoning, "Action proposed");
        }
        Ok(proposal)
    }
}
