//! # Castwise Core
//!
//! Domain types, traits, and error definitions for the Castwise agent executor.
//! This crate has **zero framework dependencies**: it defines the contracts
//! that the agent loop consumes and that providers and tools implement.
//!
//! - [`Tool`] / [`ToolRegistry`]: the uniform capability contract
//! - [`Provider`]: the reasoning-service completion call
//! - [`ActionRecord`]: feedback about the previous iteration

pub mod action;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use action::{ActionOutcome, ActionRecord, NO_PREVIOUS_ACTION};
pub use error::{DecisionError, Error, ProviderError, Result, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{Tool, ToolDescriptor, ToolParams, ToolRegistry};
