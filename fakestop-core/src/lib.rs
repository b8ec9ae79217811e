pub mod config;
pub mod db;
pub mod driver;
pub mod error;
pub mod llm;
pub mod mock;
pub mod models;
pub mod pipeline;
pub mod stage;
pub mod store;

pub use config::FakestopConfig;
pub use driver::{validate_news, Analyzer};
pub use error::FakestopError;
pub use llm::{ChatBackend, ChatMessage, LlmConfig, LlmError, OpenAiChatClient};
pub use models::{AnalysisDocuments, AnalysisRecord, NewAnalysis, Verdict};
pub use pipeline::{classification_input, Pipeline, PipelineOutput};
pub use stage::{PromptSet, Stage};
pub use store::AnalysisStore;
