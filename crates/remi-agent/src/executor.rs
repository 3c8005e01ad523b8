//! The reasoning loop driver.
//!
//! Thinking → Acting → Observing, cycling until the model emits a final
//! answer or a hard limit trips. Collaborators are injected; the
//! executor owns no I/O of its own beyond calling them.

use crate::parser;
use crate::prompt::PromptBuilder;
use crate::step::{AgentStep, Scratchpad};
use crate::tool::Tool;
use chrono::Local;
use remi_core::error::RemiError;
use remi_core::traits::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Stop sequence handed to the model so it cannot fabricate its own
/// observation text — generation halts right before "Observation:".
pub const STOP_SEQUENCE: &str = "\nObservation:";

/// Drives one reasoning session per `run` call. Sessions share no
/// state; a fresh scratchpad is created and discarded each time.
pub struct AgentExecutor {
    provider: Arc<dyn Provider>,
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Catalog in registration order, for stable prompt rendering.
    catalog: Vec<Arc<dyn Tool>>,
    prompt: PromptBuilder,
    max_steps: usize,
    model_timeout: Duration,
}

impl AgentExecutor {
    /// Build an executor over a static tool set.
    ///
    /// An empty tool set is refused up front: it would make every
    /// prompt invalid, so it is a configuration error, not something to
    /// discover mid-turn.
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Vec<Arc<dyn Tool>>,
        prompt: PromptBuilder,
        max_steps: usize,
        model_timeout: Duration,
    ) -> Result<Self, RemiError> {
        if tools.is_empty() {
            return Err(RemiError::Config("no tools registered".into()));
        }
        let map = tools
            .iter()
            .map(|t| (t.name().to_string(), Arc::clone(t)))
            .collect();
        Ok(Self {
            provider,
            tools: map,
            catalog: tools,
            prompt,
            max_steps,
            model_timeout,
        })
    }

    /// Run one reasoning session over the user's input, returning the
    /// final answer text.
    pub async fn run(&self, input: &str) -> Result<String, RemiError> {
        let mut scratchpad = Scratchpad::new();
        let stop = [STOP_SEQUENCE.to_string()];

        for step in 0..self.max_steps {
            let prompt = self.prompt.build(
                input,
                &scratchpad,
                &self.catalog,
                Local::now().naive_local(),
            )?;

            let raw = match tokio::time::timeout(
                self.model_timeout,
                self.provider.complete(&prompt, &stop),
            )
            .await
            {
                Ok(result) => result?,
                Err(_) => return Err(RemiError::Timeout(self.model_timeout.as_secs())),
            };

            match parser::parse(&raw)? {
                AgentStep::Finish(finish) => {
                    debug!("agent finished after {} step(s)", step + 1);
                    return Ok(finish.output);
                }
                AgentStep::Action(action) => {
                    let tool = self
                        .tools
                        .get(&action.tool)
                        .ok_or_else(|| RemiError::UnknownTool(action.tool.clone()))?
                        .clone();

                    // Tool input errors are recovered locally: the error
                    // text becomes the observation and the loop goes on.
                    let observation = match tool.invoke(&action.tool_input).await {
                        Ok(obs) => obs,
                        Err(e) => {
                            warn!("tool '{}' rejected input: {e}", action.tool);
                            e.to_string()
                        }
                    };
                    scratchpad.push(action, observation);
                }
            }
        }

        Err(RemiError::LoopExceeded(self.max_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that replays a scripted sequence of completions.
    struct ScriptedProvider {
        outputs: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
        stops: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn new(outputs: &[&str]) -> Self {
            let mut outputs: Vec<String> = outputs.iter().map(|s| s.to_string()).collect();
            outputs.reverse();
            Self {
                outputs: Mutex::new(outputs),
                prompts: Mutex::new(Vec::new()),
                stops: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }
        fn requires_api_key(&self) -> bool {
            false
        }
        async fn complete(&self, prompt: &str, stop: &[String]) -> Result<String, RemiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.stops.lock().unwrap().push(stop.to_vec());
            self.outputs
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| RemiError::Provider("script exhausted".into()))
        }
        async fn is_available(&self) -> bool {
            true
        }
    }

    /// Provider that never completes within any deadline.
    struct StalledProvider;

    #[async_trait]
    impl Provider for StalledProvider {
        fn name(&self) -> &str {
            "stalled"
        }
        fn requires_api_key(&self) -> bool {
            false
        }
        async fn complete(&self, _prompt: &str, _stop: &[String]) -> Result<String, RemiError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
        async fn is_available(&self) -> bool {
            true
        }
    }

    /// Tool that records invocations and echoes a fixed observation.
    struct EchoTool {
        invocations: Mutex<Vec<String>>,
        fail_with: Option<fn(&str) -> ToolError>,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                invocations: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "Set a reminder"
        }
        fn description(&self) -> &str {
            "Sets a reminder."
        }
        async fn invoke(&self, input: &str) -> Result<String, ToolError> {
            self.invocations.lock().unwrap().push(input.to_string());
            if let Some(fail) = self.fail_with {
                return Err(fail(input));
            }
            Ok(format!("Reminder set: {input}"))
        }
    }

    fn executor_with(
        provider: Arc<dyn Provider>,
        tool: Arc<dyn Tool>,
        max_steps: usize,
    ) -> AgentExecutor {
        AgentExecutor::new(
            provider,
            vec![tool],
            PromptBuilder::new("neutral"),
            max_steps,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_immediate_finish() {
        let provider = Arc::new(ScriptedProvider::new(&["Final Answer: Nothing to do."]));
        let tool = Arc::new(EchoTool::new());
        let exec = executor_with(provider.clone(), tool.clone(), 15);

        let out = exec.run("hello").await.unwrap();
        assert_eq!(out, "Nothing to do.");
        assert!(tool.invocations.lock().unwrap().is_empty());
        // Stop sequence passed through on every call.
        assert_eq!(provider.stops.lock().unwrap()[0], vec![STOP_SEQUENCE]);
    }

    #[tokio::test]
    async fn test_action_then_finish_feeds_observation_back() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Thought: set it\nAction: Set a reminder\nAction Input: 2020-09-24 15:08,Birthday party",
            "Thought: done\nFinal Answer: Your reminder is set!",
        ]));
        let tool = Arc::new(EchoTool::new());
        let exec = executor_with(provider.clone(), tool.clone(), 15);

        let out = exec.run("remind me").await.unwrap();
        assert_eq!(out, "Your reminder is set!");
        assert_eq!(
            *tool.invocations.lock().unwrap(),
            vec!["2020-09-24 15:08,Birthday party"]
        );

        // Second prompt carries the first step's log and observation.
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("Thought: set it\nAction: Set a reminder"));
        assert!(prompts[1].contains("Observation: Reminder set: 2020-09-24 15:08,Birthday party"));
    }

    #[tokio::test]
    async fn test_tool_error_becomes_observation_and_loop_continues() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Action: Set a reminder\nAction Input: no comma here",
            "Final Answer: Sorry, I could not set that reminder.",
        ]));
        let tool = Arc::new(EchoTool {
            invocations: Mutex::new(Vec::new()),
            fail_with: Some(|input| ToolError::Argument(format!("got `{input}`"))),
        });
        let exec = executor_with(provider.clone(), tool, 15);

        let out = exec.run("remind me").await.unwrap();
        assert_eq!(out, "Sorry, I could not set that reminder.");
        let prompts = provider.prompts.lock().unwrap();
        assert!(
            prompts[1].contains("Observation: Invalid input: got `no comma here`"),
            "tool error text is the observation"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_aborts_turn() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "Action: Launch the missiles\nAction Input: now",
        ]));
        let exec = executor_with(provider, Arc::new(EchoTool::new()), 15);

        match exec.run("x").await {
            Err(RemiError::UnknownTool(name)) => assert_eq!(name, "Launch the missiles"),
            other => panic!("expected unknown tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_output_aborts_turn() {
        let provider = Arc::new(ScriptedProvider::new(&["total gibberish"]));
        let exec = executor_with(provider, Arc::new(EchoTool::new()), 15);

        match exec.run("x").await {
            Err(RemiError::Parse(text)) => assert_eq!(text, "total gibberish"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_loop_cap_enforced() {
        // The model keeps acting and never finishes.
        let provider = Arc::new(ScriptedProvider::new(&[
            "Action: Set a reminder\nAction Input: a",
            "Action: Set a reminder\nAction Input: b",
            "Action: Set a reminder\nAction Input: c",
        ]));
        let tool = Arc::new(EchoTool::new());
        let exec = executor_with(provider, tool.clone(), 3);

        match exec.run("x").await {
            Err(RemiError::LoopExceeded(n)) => assert_eq!(n, 3),
            other => panic!("expected loop exceeded, got {other:?}"),
        }
        assert_eq!(tool.invocations.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_timeout() {
        let exec = AgentExecutor::new(
            Arc::new(StalledProvider),
            vec![Arc::new(EchoTool::new())],
            PromptBuilder::new("neutral"),
            15,
            Duration::from_secs(60),
        )
        .unwrap();

        match exec.run("x").await {
            Err(RemiError::Timeout(secs)) => assert_eq!(secs, 60),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tool_set_is_config_error() {
        let result = AgentExecutor::new(
            Arc::new(StalledProvider),
            Vec::new(),
            PromptBuilder::new("neutral"),
            15,
            Duration::from_secs(60),
        );
        match result {
            Err(RemiError::Config(_)) => {}
            other => panic!("expected config error, got {:?}", other.err()),
        }
    }
}
