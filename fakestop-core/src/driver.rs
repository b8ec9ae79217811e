//! Analysis driver shared by the console and web front ends.
//!
//! Validates the submission, runs the pipeline and persists the outcome as a
//! single record. A failure at any point before the insert leaves the store
//! untouched.

use std::sync::Arc;

use crate::config::FakestopConfig;
use crate::db;
use crate::error::FakestopError;
use crate::llm::{LlmConfig, OpenAiChatClient};
use crate::models::analysis::timestamp_now;
use crate::models::{AnalysisRecord, NewAnalysis};
use crate::pipeline::Pipeline;
use crate::stage::PromptSet;
use crate::store::AnalysisStore;

/// Reject empty or whitespace-only news before anything else runs.
pub fn validate_news(news: &str) -> Result<&str, FakestopError> {
    if news.trim().is_empty() {
        return Err(FakestopError::EmptyNews);
    }
    Ok(news)
}

#[derive(Clone)]
pub struct Analyzer {
    pipeline: Pipeline,
    store: AnalysisStore,
}

impl Analyzer {
    pub fn new(pipeline: Pipeline, store: AnalysisStore) -> Self {
        Self { pipeline, store }
    }

    /// Wire everything from config: open the database, create the table,
    /// load prompts and build the chat client.
    pub async fn from_config(config: &FakestopConfig) -> Result<Self, FakestopError> {
        let pool = db::create_pool(&config.database).await?;
        let store = AnalysisStore::new(pool);
        store.initialize().await?;

        let prompts = PromptSet::load(config.prompts.path.as_deref())?;
        let client = OpenAiChatClient::new(LlmConfig::from_settings(None, &config.llm))?;

        Ok(Self::new(Pipeline::new(Arc::new(client), prompts), store))
    }

    pub fn store(&self) -> &AnalysisStore {
        &self.store
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the full pipeline on `news` and persist the result.
    pub async fn analyze(&self, news: &str) -> Result<AnalysisRecord, FakestopError> {
        let news = validate_news(news)?;
        tracing::info!(chars = news.chars().count(), "Starting analysis");

        let output = self.pipeline.run(news).await?;

        let analysis = NewAnalysis {
            noticia: news.to_string(),
            fontes: output.sources,
            analise_linguistica: output.linguistic,
            verificacao_fatos: output.verification,
            classificacao_final: output.classification,
            data_analise: timestamp_now(),
        };
        let id = self.store.insert(&analysis).await?;

        let record = AnalysisRecord::from_new(id, analysis);
        tracing::info!(
            id = record.id,
            verdict = ?record.verdict(),
            "Analysis complete"
        );
        Ok(record)
    }
}
