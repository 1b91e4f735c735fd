//! Agents and the orchestrator boundary
//!
//! An `Agent` is one role (name, description, instructions, optional tools)
//! driven by a `ChatModel`. `AgentOrchestrator` is the single call the rest
//! of the service depends on.

use crate::error::StudioError;
use crate::llm::{ChatModel, ModelRequest, ToolResult, Turn};
use crate::models::{Prompt, RunOutput};
use crate::tools::ToolRegistry;
use crate::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod team;
pub use team::MovieProducers;

const MAX_TOOL_ROUNDS: usize = 5;

/// Orchestrator boundary: one prompt in, one response object or one fault out.
#[async_trait]
pub trait AgentOrchestrator: Send + Sync {
    async fn run(&self, prompt: &Prompt) -> Result<RunOutput>;
}

/// A single LLM-backed role
pub struct Agent {
    name: String,
    description: String,
    instructions: Vec<String>,
    tools: ToolRegistry,
    model: Arc<dyn ChatModel>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            instructions: Vec::new(),
            tools: ToolRegistry::new(),
            model,
        }
    }

    pub fn with_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// System instruction: description followed by a bulleted instruction list.
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.description.trim().to_string();
        if !self.instructions.is_empty() {
            prompt.push_str("\n\nInstructions:");
            for instruction in &self.instructions {
                prompt.push_str("\n- ");
                prompt.push_str(instruction);
            }
        }
        prompt
    }

    /// Run one task to completion, executing any tool calls the model makes.
    pub async fn run(&self, task: &str) -> Result<String> {
        let mut request = ModelRequest {
            system: self.system_prompt(),
            turns: vec![Turn::User(task.to_string())],
            tools: self.tools.specs(),
        };

        info!(agent = %self.name, model = self.model.model_id(), "Agent: starting task");

        for round in 0..=MAX_TOOL_ROUNDS {
            let reply = self.model.generate(&request).await?;

            if !reply.wants_tools() {
                debug!(agent = %self.name, rounds = round, "Agent: task complete");
                return Ok(reply.text);
            }

            if round == MAX_TOOL_ROUNDS {
                break;
            }

            let mut results = Vec::with_capacity(reply.tool_calls.len());
            for call in &reply.tool_calls {
                debug!(agent = %self.name, tool = %call.name, "Agent: tool call");

                let response = match self.tools.execute(&call.name, call.args.clone()).await {
                    Ok(output) => output.data,
                    Err(e) => {
                        warn!(agent = %self.name, tool = %call.name, error = %e, "Tool call failed");
                        json!({ "error": e.to_string() })
                    }
                };

                results.push(ToolResult {
                    name: call.name.clone(),
                    response,
                });
            }

            request.turns.push(Turn::Model(reply));
            request.turns.push(Turn::ToolResults(results));
        }

        Err(StudioError::AgentError(format!(
            "{} exceeded {} tool rounds",
            self.name, MAX_TOOL_ROUNDS
        )))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use crate::llm::{ModelReply, ToolCall};
    use crate::models::{ToolInput, ToolOutput};
    use crate::tools::Tool;

    struct FakeSearch;

    #[async_trait]
    impl Tool for FakeSearch {
        fn name(&self) -> &'static str {
            "search_google"
        }

        fn description(&self) -> &'static str {
            "fake search"
        }

        fn parameters(&self) -> serde_json::Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
            Ok(ToolOutput {
                success: true,
                data: json!({ "results": [{ "title": input.parameters["query"] }] }),
                error: None,
            })
        }
    }

    fn search_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FakeSearch));
        registry
    }

    fn call(name: &str) -> ModelReply {
        ModelReply {
            text: String::new(),
            tool_calls: vec![ToolCall {
                name: name.to_string(),
                args: json!({ "query": "Pedro Pascal" }),
                thought_signature: None,
            }],
        }
    }

    #[test]
    fn test_system_prompt() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let agent = Agent::new("ScriptWriter", "  You write scripts.\n", model)
            .with_instructions(["Three acts.", "Two twists."]);

        assert_eq!(
            agent.system_prompt(),
            "You write scripts.\n\nInstructions:\n- Three acts.\n- Two twists."
        );
    }

    #[tokio::test]
    async fn test_plain_answer() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(ModelReply::text("Act I..."))]));
        let agent = Agent::new("ScriptWriter", "writer", model.clone());

        assert_eq!(agent.run("idea").await.unwrap(), "Act I...");
        assert_eq!(model.request_count(), 1);
        assert!(model.requests.lock().unwrap()[0].tools.is_empty());
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(call("search_google")),
            Ok(ModelReply::text("Cast Pedro Pascal as the keeper.")),
        ]));
        let agent =
            Agent::new("CastingDirector", "caster", model.clone()).with_tools(search_registry());

        let answer = agent.run("outline").await.unwrap();
        assert_eq!(answer, "Cast Pedro Pascal as the keeper.");

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tools.len(), 1);
        match &requests[1].turns[2] {
            Turn::ToolResults(results) => {
                assert_eq!(results[0].name, "search_google");
                assert_eq!(results[0].response["results"][0]["title"], "Pedro Pascal");
            }
            other => panic!("unexpected turn {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_thought_signature_replayed_with_call() {
        let mut signed = call("search_google");
        signed.tool_calls[0].thought_signature = Some("sig-1".to_string());
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(signed),
            Ok(ModelReply::text("done")),
        ]));
        let agent =
            Agent::new("CastingDirector", "caster", model.clone()).with_tools(search_registry());

        agent.run("outline").await.unwrap();

        let requests = model.requests.lock().unwrap();
        match &requests[1].turns[1] {
            Turn::Model(reply) => {
                assert_eq!(reply.tool_calls[0].thought_signature.as_deref(), Some("sig-1"));
            }
            other => panic!("unexpected turn {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(call("imdb_lookup")),
            Ok(ModelReply::text("done")),
        ]));
        let agent = Agent::new("CastingDirector", "caster", model.clone());

        assert_eq!(agent.run("outline").await.unwrap(), "done");

        let requests = model.requests.lock().unwrap();
        match &requests[1].turns[2] {
            Turn::ToolResults(results) => {
                let error = results[0].response["error"].as_str().unwrap();
                assert!(error.contains("imdb_lookup"));
            }
            other => panic!("unexpected turn {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tool_round_limit() {
        let replies = (0..=MAX_TOOL_ROUNDS).map(|_| Ok(call("search_google"))).collect();
        let model = Arc::new(ScriptedModel::new(replies));
        let agent =
            Agent::new("CastingDirector", "caster", model.clone()).with_tools(search_registry());

        let err = agent.run("outline").await.unwrap_err();
        assert!(matches!(err, StudioError::AgentError(_)));
        assert_eq!(model.request_count(), MAX_TOOL_ROUNDS + 1);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let model = Arc::new(ScriptedModel::new(vec![Err(StudioError::Upstream {
            status: 503,
            body: "{\"error\":{}}".into(),
        })]));
        let agent = Agent::new("ScriptWriter", "writer", model);

        let err = agent.run("idea").await.unwrap_err();
        assert!(matches!(err, StudioError::Upstream { status: 503, .. }));
    }
}
