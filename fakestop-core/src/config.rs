use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct FakestopConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub llm: LlmSettings,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Model settings. The API key is never read from the config file; it comes
/// from `OPENAI_API_KEY`.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmSettings {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PromptsConfig {
    /// Optional TOML file overriding the built-in stage templates.
    pub path: Option<String>,
}

impl FakestopConfig {
    /// Layered load: built-in defaults, then the TOML file at `path` (optional),
    /// then `FAKESTOP_*` environment variables (`FAKESTOP_LLM__MODEL=...`).
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("service.log_level", "info")?
            .set_default("database.url", "sqlite://fakestop.db")?
            .set_default("database.max_connections", 4)?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.base_url", "https://api.openai.com/v1")?
            .set_default("llm.timeout_seconds", 120)?
            .set_default("llm.max_retries", 0)?
            .set_default("llm.retry_delay_ms", 1000)?
            .set_default("http.host", "127.0.0.1")?
            .set_default("http.port", 8501)?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("FAKESTOP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        s.try_deserialize()
    }
}
