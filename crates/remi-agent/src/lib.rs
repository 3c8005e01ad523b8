//! # remi-agent
//!
//! The reasoning loop: prompt templating, model output parsing, tool
//! invocation, and the executor that ties them together.

pub mod executor;
pub mod parser;
pub mod prompt;
pub mod reminder_tool;
pub mod step;
pub mod tool;

pub use executor::{AgentExecutor, STOP_SEQUENCE};
pub use prompt::PromptBuilder;
pub use reminder_tool::ReminderTool;
pub use step::{AgentAction, AgentFinish, AgentStep, Scratchpad};
pub use tool::{Tool, ToolError};
