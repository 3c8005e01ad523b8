//! Tool seam for the reasoning loop.
//!
//! A tool is a named, described, invocable capability. The executor
//! holds a map from name to tool built at startup; there is no runtime
//! registration.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised at the tool boundary.
///
/// These never abort a turn: the executor turns them into observations
/// so the model can see what went wrong and self-correct on the next
/// cycle. The messages are written for the model, not for operators.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Input did not have the shape the tool expects.
    #[error("Invalid input: {0}")]
    Argument(String),

    /// The time portion of the input did not match the fixed format.
    #[error("Invalid time: {0}")]
    TimeFormat(String),

    /// The backing store rejected the write.
    #[error("Could not save the reminder: {0}")]
    Store(String),
}

/// A capability the reasoning loop may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model must emit after `Action:`.
    fn name(&self) -> &str;

    /// Description rendered into the prompt's tool catalog.
    fn description(&self) -> &str;

    /// Execute with the parsed action input; the `Ok` string becomes
    /// the loop's observation.
    async fn invoke(&self, input: &str) -> Result<String, ToolError>;
}
