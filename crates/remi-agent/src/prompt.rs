//! Prompt assembly for the reasoning loop.
//!
//! Pure function of (input, scratchpad, tool catalog, now): the same
//! arguments always produce the same prompt text.

use crate::step::Scratchpad;
use crate::tool::Tool;
use chrono::NaiveDateTime;
use remi_core::error::RemiError;
use remi_core::reminder::DUE_TIME_FORMAT;
use std::sync::Arc;

/// ReAct-style template. Placeholders are filled by [`PromptBuilder::build`].
const TEMPLATE: &str = r#"You are an assistant that manages reminders. Work out what time and what text the reminder should have. The current time is {current_time}. You have access to the following tools:

{tools}

Use the following format:

Question: the user input
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the result of the action
Final Answer: the final answer to the original input, with the tone of voice: "{tone_of_voice}".

Begin! Clearly indicate to the user what action has been taken.

Question: {input}
{agent_scratchpad}"#;

/// Assembles the model-facing prompt.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    tone_of_voice: String,
}

impl PromptBuilder {
    pub fn new(tone_of_voice: impl Into<String>) -> Self {
        Self {
            tone_of_voice: tone_of_voice.into(),
        }
    }

    /// Render the full prompt for one reasoning cycle.
    ///
    /// Fails with a config error if the tool catalog is empty — an
    /// agent with nothing to invoke is a wiring mistake, not a runtime
    /// condition.
    pub fn build(
        &self,
        input: &str,
        scratchpad: &Scratchpad,
        tools: &[Arc<dyn Tool>],
        now: NaiveDateTime,
    ) -> Result<String, RemiError> {
        if tools.is_empty() {
            return Err(RemiError::Config("no tools registered".into()));
        }

        let catalog = tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");
        let names = tools
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(TEMPLATE
            .replace("{current_time}", &now.format(DUE_TIME_FORMAT).to_string())
            .replace("{tools}", &catalog)
            .replace("{tool_names}", &names)
            .replace("{tone_of_voice}", &self.tone_of_voice)
            .replace("{input}", input)
            .replace("{agent_scratchpad}", &scratchpad.render()))
    }
}
