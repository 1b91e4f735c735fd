//! MovieProducers team
//!
//! SCRIPT WRITER → CASTING DIRECTOR → PRODUCER SUMMARY

use super::{Agent, AgentOrchestrator};
use crate::classifier::error_payload;
use crate::error::StudioError;
use crate::llm::ChatModel;
use crate::models::{Content, Prompt, RunOutput, RunStatus};
use crate::tools::ToolRegistry;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub const TEAM_NAME: &str = "MovieProducers";

/// Producer-led team that turns a movie brief into an outline plus casting.
pub struct MovieProducers {
    script_writer: Agent,
    casting_director: Agent,
    producer: Agent,
}

impl MovieProducers {
    pub fn new(model: Arc<dyn ChatModel>, casting_tools: ToolRegistry) -> Self {
        let script_writer = Agent::new(
            "ScriptWriter",
            "You are an expert screenplay writer. Given a movie idea and genre, \
             develop a compelling script outline with character descriptions and key plot points.",
            model.clone(),
        )
        .with_instructions([
            "Write a script outline with 3-5 main characters and key plot points.",
            "Outline the three-act structure and suggest 2-3 twists.",
            "Ensure the script aligns with the specified genre and target audience.",
        ]);

        let casting_director = Agent::new(
            "CastingDirector",
            "You are a talented casting director. Given a script outline and character descriptions, \
             suggest suitable actors for the main roles, considering their past performances \
             and current availability.",
            model.clone(),
        )
        .with_instructions([
            "Suggest 2-3 actors for each main role.",
            "Check actors' current status using `search_google`.",
            "Provide a brief explanation for each casting suggestion.",
            "Consider diversity and representation in your casting choices.",
        ])
        .with_tools(casting_tools);

        let producer = Agent::new(
            "Producer",
            "Experienced movie producer overseeing script and casting.",
            model,
        )
        .with_instructions([
            "Summarize the script outline and casting suggestions.",
            "Provide a concise movie concept overview.",
            "Format the answer as markdown.",
        ]);

        Self {
            script_writer,
            casting_director,
            producer,
        }
    }

    async fn run_stages(&self, prompt: &Prompt) -> Result<String> {
        let outline = self.script_writer.run(prompt.as_str()).await?;

        let casting_task = format!(
            "{}\nScript outline from {}:\n\n{}",
            prompt,
            self.script_writer.name(),
            outline
        );
        let casting = self.casting_director.run(&casting_task).await?;

        let summary_task = format!(
            "{}\nScript outline:\n\n{}\n\nCasting suggestions:\n\n{}",
            prompt, outline, casting
        );
        self.producer.run(&summary_task).await
    }
}

#[async_trait]
impl AgentOrchestrator for MovieProducers {
    async fn run(&self, prompt: &Prompt) -> Result<RunOutput> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        info!(run_id = %run_id, "MovieProducers: run started");

        let (status, content) = match self.run_stages(prompt).await {
            Ok(summary) => (RunStatus::Completed, Content::Text(summary)),
            // Provider error payloads come back as the run's content; any
            // other provider body stays a fault.
            Err(StudioError::Upstream { status, body }) if error_payload(&body).is_some() => {
                warn!(run_id = %run_id, status, "MovieProducers: provider error");
                (RunStatus::Error, Content::Text(body))
            }
            Err(e) => return Err(e),
        };

        info!(
            run_id = %run_id,
            status = ?status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "MovieProducers: run finished"
        );

        Ok(RunOutput {
            run_id,
            team: TEAM_NAME.to_string(),
            status,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::ScriptedModel;
    use crate::llm::{ModelReply, Turn};
    use crate::models::{Audience, Genre, MovieRequest, Runtime};

    fn prompt() -> Prompt {
        Prompt::compose(&MovieRequest {
            idea: "A lighthouse keeper hears a signal".to_string(),
            genre: Genre::Thriller,
            audience: Audience::Adults,
            runtime: Runtime::default(),
        })
    }

    fn user_text(turn: &Turn) -> &str {
        match turn {
            Turn::User(text) => text,
            other => panic!("expected user turn, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelReply::text("OUTLINE")),
            Ok(ModelReply::text("CASTING")),
            Ok(ModelReply::text("## Overview")),
        ]));
        let team = MovieProducers::new(model.clone(), ToolRegistry::new());

        let output = team.run(&prompt()).await.unwrap();
        assert_eq!(output.status, RunStatus::Completed);
        assert_eq!(output.team, TEAM_NAME);
        assert_eq!(output.content, Content::Text("## Overview".to_string()));

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].system.starts_with("You are an expert screenplay writer"));
        assert!(user_text(&requests[0].turns[0]).starts_with("Movie idea: A lighthouse keeper"));
        assert!(requests[1].system.contains("casting director"));
        assert!(user_text(&requests[1].turns[0]).contains("OUTLINE"));
        let summary_task = user_text(&requests[2].turns[0]);
        assert!(summary_task.contains("OUTLINE") && summary_task.contains("CASTING"));
    }

    #[tokio::test]
    async fn test_provider_error_becomes_content() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded"}}"#;
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelReply::text("OUTLINE")),
            Err(StudioError::Upstream {
                status: 429,
                body: body.to_string(),
            }),
        ]));
        let team = MovieProducers::new(model.clone(), ToolRegistry::new());

        let output = team.run(&prompt()).await.unwrap();
        assert_eq!(output.status, RunStatus::Error);
        assert_eq!(output.content, Content::Text(body.to_string()));
        assert_eq!(model.request_count(), 2);
    }

    #[tokio::test]
    async fn test_non_payload_provider_bodies_stay_faults() {
        let bodies = vec!["<html><body>502 Bad Gateway</body></html>", "", "Service Unavailable"];

        for body in bodies {
            let model = Arc::new(ScriptedModel::new(vec![Err(StudioError::Upstream {
                status: 502,
                body: body.to_string(),
            })]));
            let team = MovieProducers::new(model, ToolRegistry::new());

            match team.run(&prompt()).await {
                Err(StudioError::Upstream { status, body: raw }) => {
                    assert_eq!(status, 502);
                    assert_eq!(raw, body);
                }
                other => panic!("expected upstream fault for {:?}, got {:?}", body, other),
            }
        }
    }

    #[tokio::test]
    async fn test_other_errors_are_faults() {
        let model = Arc::new(ScriptedModel::new(vec![Err(StudioError::LlmError(
            "connection reset".to_string(),
        ))]));
        let team = MovieProducers::new(model, ToolRegistry::new());

        let err = team.run(&prompt()).await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: connection reset");
    }
}
