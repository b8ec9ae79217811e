//! Four-stage fact-checking pipeline
//!
//! Collector → Linguist → Verifier run as one sequential batch (the
//! investigation). The linguist and verifier documents are then joined under
//! two fixed headings and handed to the Classifier as a second batch.
//! Documents move between stages as owned strings; nothing touches disk here.

use std::sync::Arc;
use std::time::Instant;

use crate::error::FakestopError;
use crate::llm::ChatBackend;
use crate::stage::{PromptSet, Stage};

pub const REVISED_TEXT_HEADING: &str = "# Texto Jornalístico Revisado";
pub const VERIFICATION_HEADING: &str = "# Relatório de Verificação de Fatos";

/// The classifier's input: both documents verbatim under the fixed headings.
pub fn classification_input(linguistic: &str, verification: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        REVISED_TEXT_HEADING, linguistic, VERIFICATION_HEADING, verification
    )
}

/// Output of the first batch (stages 1–3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Investigation {
    pub sources: String,
    pub linguistic: String,
    pub verification: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub sources: String,
    pub linguistic: String,
    pub verification: String,
    pub classification: String,
}

#[derive(Clone)]
pub struct Pipeline {
    backend: Arc<dyn ChatBackend>,
    prompts: PromptSet,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn ChatBackend>, prompts: PromptSet) -> Self {
        Self { backend, prompts }
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Render the stage template and make one model call.
    pub async fn run_stage(
        &self,
        stage: Stage,
        news: &str,
        input: &str,
    ) -> Result<String, FakestopError> {
        let messages = self.prompts.get(stage).render(news, input);
        let start = Instant::now();
        tracing::info!(stage = %stage, model = self.backend.model(), "Running stage");

        match self.backend.complete(&messages).await {
            Ok(document) => {
                tracing::info!(
                    stage = %stage,
                    took_ms = start.elapsed().as_millis() as u64,
                    chars = document.chars().count(),
                    "Stage finished"
                );
                Ok(document)
            }
            Err(source) => {
                tracing::error!(stage = %stage, error = %source, "Stage failed");
                Err(FakestopError::StageFailed { stage, source })
            }
        }
    }

    pub async fn investigate(&self, news: &str) -> Result<Investigation, FakestopError> {
        let sources = self.run_stage(Stage::Collector, news, news).await?;
        let linguistic = self.run_stage(Stage::Linguist, news, &sources).await?;
        let verification = self.run_stage(Stage::Verifier, news, &linguistic).await?;

        Ok(Investigation {
            sources,
            linguistic,
            verification,
        })
    }

    pub async fn classify(
        &self,
        news: &str,
        investigation: &Investigation,
    ) -> Result<String, FakestopError> {
        let input = classification_input(&investigation.linguistic, &investigation.verification);
        self.run_stage(Stage::Classifier, news, &input).await
    }

    pub async fn run(&self, news: &str) -> Result<PipelineOutput, FakestopError> {
        let investigation = self.investigate(news).await?;
        let classification = self.classify(news, &investigation).await?;

        Ok(PipelineOutput {
            sources: investigation.sources,
            linguistic: investigation.linguistic,
            verification: investigation.verification,
            classification,
        })
    }
}
