//! Turning raw model output into an action proposal.
//!
//! The model's text is untrusted. [`parse_action`] never panics: every
//! input yields either a proposal or a [`DecisionError`] the loop can act on.

use castwise_core::error::DecisionError;
use castwise_core::tool::ToolParams;
use serde_json::Value;

/// A parsed, not yet resolved, action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionProposal {
    /// Registry key the model asked for. Not yet checked against the registry.
    pub tool: String,
    pub params: ToolParams,
    /// Free-text justification, when the model gave one.
    pub reasoning: Option<String>,
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`, `JSON`, ...) on the opening line.
    let body = match body.find('\n') {
        Some(newline) if body[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &body[newline + 1..]
        }
        _ => body
            .strip_prefix("json")
            .or_else(|| body.strip_prefix("JSON"))
            .unwrap_or(body),
    };

    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the model's raw completion text into an [`ActionProposal`].
///
/// - empty or whitespace-only text: [`DecisionError::EmptyResponse`]
/// - not a JSON object, or `params` present but not an object:
///   [`DecisionError::Malformed`]
/// - `tool` absent, blank, or not a string: [`DecisionError::MissingTool`]
///
/// A missing or `null` `params` becomes an empty mapping.
pub fn parse_action(raw: &str) -> Result<ActionProposal, DecisionError> {
    let payload = strip_code_fence(raw);
    if payload.is_empty() {
        return Err(DecisionError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(payload).map_err(|e| DecisionError::Malformed {
        reason: e.to_string(),
    })?;

    let Value::Object(mut object) = value else {
        return Err(DecisionError::Malformed {
            reason: "expected a JSON object".into(),
        });
    };

    let params = match object.remove("params") {
        None | Some(Value::Null) => ToolParams::new(),
        Some(Value::Object(params)) => params,
        Some(other) => {
            return Err(DecisionError::Malformed {
                reason: format!("\"params\" must be an object, got {}", type_name(&other)),
            });
        }
    };

    let tool = match object.remove("tool") {
        Some(Value::String(tool)) if !tool.trim().is_empty() => tool.trim().to_string(),
        _ => return Err(DecisionError::MissingTool),
    };

    let reasoning = match object.remove("reasoning") {
        Some(Value::String(text)) => Some(text),
        _ => None,
    };

    Ok(ActionProposal {
        tool,
        params,
        reasoning,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
