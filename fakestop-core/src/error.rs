use thiserror::Error;

use crate::llm::LlmError;
use crate::stage::Stage;

#[derive(Error, Debug)]
pub enum FakestopError {
    #[error("Você deve informar uma notícia para verificar.")]
    EmptyNews,

    #[error("Stage {stage} failed: {source}")]
    StageFailed {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Analysis {0} not found")]
    NotFound(i64),
}

impl FakestopError {
    /// True when the failure came from the model provider rather than from
    /// local input or storage.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::StageFailed { .. } | Self::Llm(_))
    }
}
