//! Transient loop state for one reasoning session. Nothing here is
//! persisted; a scratchpad lives for one inbound message and is
//! discarded afterward.

/// A parsed request to invoke a named tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    /// Tool name as emitted by the model.
    pub tool: String,
    /// Tool input, trimmed of whitespace and one layer of quotes.
    pub tool_input: String,
    /// The raw model text that produced this action, replayed verbatim
    /// into the next prompt.
    pub log: String,
}

/// A parsed terminal answer ending a reasoning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFinish {
    /// Everything after the terminal marker, trimmed.
    pub output: String,
    /// The full raw model text.
    pub log: String,
}

/// One parse result: either the loop continues with an action or it is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    Action(AgentAction),
    Finish(AgentFinish),
}

/// Ordered (action, observation) pairs accumulated within one session.
#[derive(Debug, Default)]
pub struct Scratchpad {
    steps: Vec<(AgentAction, String)>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an executed action and the observation it produced.
    pub fn push(&mut self, action: AgentAction, observation: String) {
        self.steps.push((action, observation));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Serialize prior steps for prompt injection: each action's raw
    /// log followed by its observation and a fresh "Thought: " opener.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (action, observation) in &self.steps {
            out.push_str(&action.log);
            out.push_str(&format!("\nObservation: {observation}\nThought: "));
        }
        out
    }
}
