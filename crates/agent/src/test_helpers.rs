//! Shared test doubles for executor and podcast tests.

use async_trait::async_trait;
use castwise_core::error::{ProviderError, ToolError};
use castwise_core::message::Message;
use castwise_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use castwise_core::tool::{Tool, ToolParams};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider that replays a script of raw completions (or errors) and
/// records every request it receives.
///
/// Once the script runs out, every further call fails with an `ApiError`.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script of plain text completions.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// The same completion, returned forever.
    pub fn repeating(text: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(text.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Text of the single prompt message sent on each call.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.messages[0].content.clone())
            .collect()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(ProviderResponse {
                message: Message::assistant(text),
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "scripted-model".into(),
            }),
            Some(Err(e)) => Err(e),
            None => Err(ProviderError::ApiError {
                status_code: 500,
                message: "script exhausted".into(),
            }),
        }
    }
}

/// A tool that always returns the same value, or always fails.
pub struct StaticTool {
    name: String,
    result: Result<serde_json::Value, String>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<ToolParams>>>,
}

impl StaticTool {
    pub fn ok(name: &str, value: impl Into<serde_json::Value>) -> Self {
        Self::with_result(name, Ok(value.into()))
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self::with_result(name, Err(message.to_string()))
    }

    fn with_result(name: &str, result: Result<serde_json::Value, String>) -> Self {
        Self {
            name: name.to_string(),
            result,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle on the execution counter that survives boxing into a registry.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Handle on the parameters of every execution.
    pub fn params_log(&self) -> Arc<Mutex<Vec<ToolParams>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Test tool"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    async fn execute(&self, params: ToolParams) -> Result<serde_json::Value, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(params);
        self.result
            .clone()
            .map_err(|reason| ToolError::ExecutionFailed {
                tool_name: self.name.clone(),
                reason,
            })
    }
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
