//! Action records: what the agent did last, and how it went.
//!
//! Exactly one record is live during a run. It is overwritten after every
//! iteration and only ever read by the prompt builder.

use crate::tool::ToolParams;
use serde::{Deserialize, Serialize};

/// Marker rendered into the prompt on the first iteration.
pub const NO_PREVIOUS_ACTION: &str = "No previous action.";

/// Result of the most recent tool dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The tool returned a value.
    Output { value: serde_json::Value },
    /// The tool's `execute` failed; the run continued.
    Failed { message: String },
    /// No tool could be resolved from the model's decision.
    Unresolved { reason: String },
}

/// Immutable record of the last executed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub tool_name: String,
    pub tool_params: ToolParams,
    pub outcome: ActionOutcome,
}

impl ActionRecord {
    pub fn succeeded(
        tool_name: impl Into<String>,
        tool_params: ToolParams,
        value: serde_json::Value,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_params,
            outcome: ActionOutcome::Output { value },
        }
    }

    pub fn failed(
        tool_name: impl Into<String>,
        tool_params: ToolParams,
        message: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_params,
            outcome: ActionOutcome::Failed {
                message: message.into(),
            },
        }
    }

    /// Synthetic record for a decision that named no resolvable tool.
    pub fn unresolved(tool_name: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.unwrap_or("unknown").to_string(),
            tool_params: ToolParams::new(),
            outcome: ActionOutcome::Unresolved {
                reason: reason.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self.outcome, ActionOutcome::Output { .. })
    }

    /// The result as it should appear in a prompt.
    ///
    /// Failures read `"Error: <message>"`, string outputs are inlined
    /// as-is, other values as compact JSON.
    pub fn result_text(&self) -> String {
        match &self.outcome {
            ActionOutcome::Output { value } => match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            ActionOutcome::Failed { message } => format!("Error: {message}"),
            ActionOutcome::Unresolved { reason } => format!("Error: {reason}"),
        }
    }

    /// Render the previous-action context block for a prompt.
    pub fn render(last: Option<&ActionRecord>) -> String {
        let Some(record) = last else {
            return NO_PREVIOUS_ACTION.to_string();
        };
        let params = serde_json::Value::Object(record.tool_params.clone());
        format!(
            "Tool: {}\nParameters: {}\nResult: {}",
            record.tool_name,
            params,
            record.result_text()
        )
    }
}
