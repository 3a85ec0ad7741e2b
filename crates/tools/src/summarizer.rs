//! Summarizer/analyst: the terminal tool.
//!
//! Hands the model's final answer back unchanged. Calling it is how the
//! model signals that the objective is met.

use async_trait::async_trait;
use castwise_core::error::ToolError;
use castwise_core::tool::{Tool, ToolParams};
use tracing::info;

pub struct SummarizerAnalystTool;

#[async_trait]
impl Tool for SummarizerAnalystTool {
    fn name(&self) -> &str {
        "summarizerAnalyst"
    }

    fn description(&self) -> &str {
        "Answer the user's question. This is the final tool to be called by the agent when the answer is ready."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "finalAnswer": {
                    "type": "string",
                    "description": "The complete and final answer to be presented to the user."
                }
            },
            "required": ["finalAnswer"]
        })
    }

    async fn execute(&self, params: ToolParams) -> Result<serde_json::Value, ToolError> {
        let answer = params
            .get("finalAnswer")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("Missing 'finalAnswer' argument".into())
            })?;

        info!(chars = answer.len(), "Final answer produced");
        Ok(serde_json::Value::String(answer.to_string()))
    }
}
