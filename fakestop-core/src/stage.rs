//! Pipeline stages and their instruction templates.
//!
//! The four stages differ only in the template they send, so they are one
//! tagged type plus a `PromptSet` loaded from TOML. The classifier's decision
//! policy lives in that TOML as instruction text.

use config::{Config, ConfigError, File, FileFormat};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::llm::ChatMessage;

/// Templates compiled into the binary.
pub const BUILTIN_PROMPTS: &str = include_str!("prompts.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Collector,
    Linguist,
    Verifier,
    Classifier,
}

impl Stage {
    /// Execution order.
    pub const ALL: [Stage; 4] = [
        Stage::Collector,
        Stage::Linguist,
        Stage::Verifier,
        Stage::Classifier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Collector => "collector",
            Stage::Linguist => "linguist",
            Stage::Verifier => "verifier",
            Stage::Classifier => "classifier",
        }
    }

    /// Heading for the stage's document in the front ends.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Collector => "Fontes Coletadas",
            Stage::Linguist => "Análise Linguística",
            Stage::Verifier => "Verificação de Fatos",
            Stage::Classifier => "Classificação Final",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StagePrompt {
    pub system: String,
    pub user: String,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(noticia|input)\}").expect("placeholder pattern is valid"))
}

/// Single-pass substitution: placeholders inside `news` or `input` stay literal.
fn render(template: &str, news: &str, input: &str) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "noticia" => news.to_string(),
            _ => input.to_string(),
        })
        .trim()
        .to_string()
}

impl StagePrompt {
    pub fn render(&self, news: &str, input: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(render(&self.system, news, input)),
            ChatMessage::user(render(&self.user, news, input)),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptSet {
    pub collector: StagePrompt,
    pub linguist: StagePrompt,
    pub verifier: StagePrompt,
    pub classifier: StagePrompt,
}

impl PromptSet {
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Built-in templates, overlaid by the TOML file at `path` when given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(BUILTIN_PROMPTS, FileFormat::Toml));
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        let set: PromptSet = builder.build()?.try_deserialize()?;
        set.validate()?;
        Ok(set)
    }

    pub fn get(&self, stage: Stage) -> &StagePrompt {
        match stage {
            Stage::Collector => &self.collector,
            Stage::Linguist => &self.linguist,
            Stage::Verifier => &self.verifier,
            Stage::Classifier => &self.classifier,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for stage in Stage::ALL {
            if !self.get(stage).user.contains("{input}") {
                return Err(ConfigError::Message(format!(
                    "prompt template for stage '{}' must reference {{input}}",
                    stage
                )));
            }
        }
        Ok(())
    }
}
