use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::verdict::Verdict;

/// Timestamp layout of `analises.data_analise`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisRecord {
    pub id: i64,
    pub noticia: String,
    pub fontes: String,
    pub analise_linguistica: String,
    pub verificacao_fatos: String,
    pub classificacao_final: String,
    pub data_analise: String,
}

/// Insert payload: every column except the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnalysis {
    pub noticia: String,
    pub fontes: String,
    pub analise_linguistica: String,
    pub verificacao_fatos: String,
    pub classificacao_final: String,
    pub data_analise: String,
}

/// The four stage documents of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisDocuments {
    pub fontes: String,
    pub analise_linguistica: String,
    pub verificacao_fatos: String,
    pub classificacao_final: String,
}

impl AnalysisRecord {
    pub fn from_new(id: i64, new: NewAnalysis) -> Self {
        Self {
            id,
            noticia: new.noticia,
            fontes: new.fontes,
            analise_linguistica: new.analise_linguistica,
            verificacao_fatos: new.verificacao_fatos,
            classificacao_final: new.classificacao_final,
            data_analise: new.data_analise,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        Verdict::detect(&self.classificacao_final)
    }

    /// First `max_chars` characters of the news text, with an ellipsis when cut.
    pub fn headline(&self, max_chars: usize) -> String {
        let mut chars = self.noticia.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }

    pub fn documents(&self) -> AnalysisDocuments {
        AnalysisDocuments {
            fontes: self.fontes.clone(),
            analise_linguistica: self.analise_linguistica.clone(),
            verificacao_fatos: self.verificacao_fatos.clone(),
            classificacao_final: self.classificacao_final.clone(),
        }
    }
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}
