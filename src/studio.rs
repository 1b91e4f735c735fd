//! Request handling from form inputs to a rendered outcome
//!
//! This is the one place orchestrator failures are caught. Whatever happens
//! downstream, callers receive a `Rendered` value.

use std::sync::Arc;
use tracing::{info, warn};

use crate::agent::{AgentOrchestrator, MovieProducers};
use crate::classifier::{Classification, ResponseClassifier};
use crate::config::StudioConfig;
use crate::disclosure::{DisclosureGate, Rendered};
use crate::gemini::GeminiClient;
use crate::models::{MovieRequest, Prompt};
use crate::tools::create_casting_registry;
use crate::Result;

#[derive(Clone)]
pub struct ScriptStudio {
    orchestrator: Arc<dyn AgentOrchestrator>,
    gate: DisclosureGate,
}

impl ScriptStudio {
    pub fn new(orchestrator: Arc<dyn AgentOrchestrator>, gate: DisclosureGate) -> Self {
        Self { orchestrator, gate }
    }

    /// Wire the Gemini-backed MovieProducers team from configuration.
    pub fn from_config(config: &StudioConfig) -> Result<Self> {
        let model = Arc::new(GeminiClient::new(
            config.google_api_key.clone(),
            config.model.clone(),
        )?);
        let casting_tools = create_casting_registry(config.serp_api_key.clone())?;
        let team = MovieProducers::new(model, casting_tools);

        Ok(Self::new(Arc::new(team), DisclosureGate::new(config.dev_mode)))
    }

    pub fn gate(&self) -> &DisclosureGate {
        &self.gate
    }

    /// Run the pipeline once and render the result for the user.
    pub async fn generate(&self, request: &MovieRequest, user_opt_in: bool) -> Rendered {
        let prompt = Prompt::compose(request);

        info!(
            genre = %request.genre,
            audience = %request.audience,
            runtime = request.runtime.minutes(),
            "Generating script"
        );

        let result = self.orchestrator.run(&prompt).await;
        let classification = ResponseClassifier::classify_result(&result);

        match &classification {
            Classification::Plain(_) => info!("Script generated"),
            Classification::UpstreamError(_) => warn!("Upstream provider error"),
            Classification::UnexpectedError(raw) => warn!(error = %raw, "Unexpected error"),
        }

        self.gate.render(&classification, user_opt_in)
    }
}
