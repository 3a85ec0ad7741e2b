//! The Castwise decision loop.
//!
//! An agent is an [`AgentConfig`] (tools, starting memory, prompt builder,
//! memory fold, done-predicate) driven by an [`AgentExecutor`]:
//!
//! 1. **Evaluate**: stop if the done-predicate holds or the budget is spent
//! 2. **Decide**: render the prompt, ask the model for `{"tool", "params"}`
//! 3. **Execute**: dispatch to the tool registered under that key
//! 4. **Fold**: merge the result into memory and go back to step 1
//!
//! Every run ends in an explicit [`LoopState`] and always terminates
//! within the configured action budget.

pub mod config;
pub mod decision;
pub mod executor;
pub mod podcast;

#[cfg(test)]
mod test_helpers;

pub use config::{AgentConfig, DEFAULT_MAX_ACTIONS};
pub use decision::{ActionProposal, parse_action, strip_code_fence};
pub use executor::{AgentExecutor, DecisionSettings, LoopState, RunOutcome};
pub use podcast::{PodcastAgent, PodcastMemory, podcast_config};
