//! Agent configuration: everything domain-specific about one agent.
//!
//! The executor knows nothing about podcasts (or any other domain). An
//! [`AgentConfig`] supplies the tools, the starting memory, and three pure
//! functions: build a prompt, fold a tool result into memory, and decide
//! whether the objective is met.

use castwise_core::action::ActionRecord;
use castwise_core::error::{Error, Result};
use castwise_core::tool::ToolRegistry;
use std::sync::Arc;

/// Default action budget per run.
pub const DEFAULT_MAX_ACTIONS: u32 = 5;

/// `(objective, memory, tool catalog, last action) -> prompt`
pub type PromptFn<M> = dyn Fn(&str, &M, &str, Option<&ActionRecord>) -> String + Send + Sync;

/// `(registry key, tool result, memory) -> new memory`
pub type UpdateFn<M> = dyn Fn(&str, &serde_json::Value, &M) -> M + Send + Sync;

/// `memory -> objective met?`
pub type DoneFn<M> = dyn Fn(&M) -> bool + Send + Sync;

/// Full parameterization of one agent behavior.
///
/// Immutable once built and safe to share between concurrent runs: every
/// run clones `initial_memory` and keeps its own counter and action record.
pub struct AgentConfig<M> {
    tools: Arc<ToolRegistry>,
    initial_memory: M,
    prompt: Arc<PromptFn<M>>,
    update: Arc<UpdateFn<M>>,
    is_done: Arc<DoneFn<M>>,
    max_actions: u32,
}

impl<M: Clone> AgentConfig<M> {
    /// Build a configuration. Fails if `tools` is empty.
    pub fn new<P, U, D>(
        tools: ToolRegistry,
        initial_memory: M,
        prompt: P,
        update: U,
        is_done: D,
    ) -> Result<Self>
    where
        P: Fn(&str, &M, &str, Option<&ActionRecord>) -> String + Send + Sync + 'static,
        U: Fn(&str, &serde_json::Value, &M) -> M + Send + Sync + 'static,
        D: Fn(&M) -> bool + Send + Sync + 'static,
    {
        if tools.is_empty() {
            return Err(Error::Config {
                message: "an agent needs at least one tool".into(),
            });
        }

        Ok(Self {
            tools: Arc::new(tools),
            initial_memory,
            prompt: Arc::new(prompt),
            update: Arc::new(update),
            is_done: Arc::new(is_done),
            max_actions: DEFAULT_MAX_ACTIONS,
        })
    }

    /// Set the action budget. A budget of 0 exhausts before the first decision.
    pub fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_actions(&self) -> u32 {
        self.max_actions
    }

    /// A fresh copy of the starting memory for a new run.
    pub fn initial_memory(&self) -> M {
        self.initial_memory.clone()
    }

    pub fn build_prompt(
        &self,
        objective: &str,
        memory: &M,
        catalog: &str,
        last_action: Option<&ActionRecord>,
    ) -> String {
        (self.prompt)(objective, memory, catalog, last_action)
    }

    pub fn update_memory(&self, tool_key: &str, result: &serde_json::Value, memory: &M) -> M {
        (self.update)(tool_key, result, memory)
    }

    pub fn is_done(&self, memory: &M) -> bool {
        (self.is_done)(memory)
    }
}

impl<M> std::fmt::Debug for AgentConfig<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("tools", &self.tools.keys())
            .field("max_actions", &self.max_actions)
            .finish_non_exhaustive()
    }
}
