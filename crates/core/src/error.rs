//! Error types for the Castwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Castwise operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Decision errors ---
    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A call-level failure talking to the reasoning service.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// A tool's `execute` call failed.
///
/// The decision loop never aborts on these; the message is folded into
/// the action record so the next prompt can see it.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream service error (status {status_code}): {message}")]
    Upstream { status_code: u16, message: String },
}

/// Why a decision step could not produce a dispatchable action.
///
/// Every variant aborts the current run.
#[derive(Debug, Clone, Error)]
pub enum DecisionError {
    #[error("reasoning service call failed: {0}")]
    Service(#[from] ProviderError),

    #[error("reasoning service returned an empty response")]
    EmptyResponse,

    #[error("response is not a valid action: {reason}")]
    Malformed { reason: String },

    #[error("response does not name a tool")]
    MissingTool,

    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
}
