//! Model output parsing.
//!
//! Raw completion text becomes either a terminal `Finish` or a
//! requested `Action`. "No match" is an expected outcome and is
//! returned as an explicit error value, not raised mid-flight.

use crate::step::{AgentAction, AgentFinish, AgentStep};
use regex::Regex;
use remi_core::error::RemiError;
use std::sync::OnceLock;

/// Literal marker that ends a reasoning session.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

fn action_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action: (.*?)[\n]*Action Input:[\s]*(.*)").expect("valid action regex")
    })
}

/// Parse raw model output into a finish or an action.
pub fn parse(raw: &str) -> Result<AgentStep, RemiError> {
    if raw.contains(FINAL_ANSWER_MARKER) {
        let output = raw
            .rsplit(FINAL_ANSWER_MARKER)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        return Ok(AgentStep::Finish(AgentFinish {
            output,
            log: raw.to_string(),
        }));
    }

    if let Some(caps) = action_re().captures(raw) {
        let tool = caps[1].trim().to_string();
        let tool_input = strip_enclosing_quotes(&caps[2]).to_string();
        return Ok(AgentStep::Action(AgentAction {
            tool,
            tool_input,
            log: raw.to_string(),
        }));
    }

    Err(RemiError::Parse(raw.to_string()))
}

/// Trim whitespace and at most one layer of enclosing double quotes.
fn strip_enclosing_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
