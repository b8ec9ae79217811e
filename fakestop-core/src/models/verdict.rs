use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Verdict label found in a classifier document.
///
/// The classification itself is made by the model; this only reads back
/// which label it wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    True,
    False,
    Uncertain,
}

fn marked_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(verdadeiro)\s*✅|\b(falso)\s*🤥|\b(duvidoso)\s*🫤")
            .expect("marked verdict pattern is valid")
    })
}

fn heading_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)classifica[çc][ãa]o(?:\s+final)?\s*:[\s*_]*(verdadeiro|falso|duvidoso|true|false|uncertain)\b",
        )
        .expect("heading verdict pattern is valid")
    })
}

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(verdadeiro|falso|duvidoso|true|false|uncertain)\b")
            .expect("verdict pattern is valid")
    })
}

fn first_group<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    let caps = pattern.captures(text)?;
    caps.iter().skip(1).flatten().next().map(|m| m.as_str())
}

impl Verdict {
    /// The label the classifier committed to in `text`.
    ///
    /// Emoji-marked labels (`FALSO🤥`) are the template's output format and
    /// win first, then a label right after `Classificação:`, then the first
    /// bare label anywhere. A label mentioned in passing ("não é verdadeiro")
    /// never overrides a marked one.
    pub fn detect(text: &str) -> Option<Self> {
        first_group(marked_pattern(), text)
            .or_else(|| first_group(heading_pattern(), text))
            .or_else(|| first_group(label_pattern(), text))
            .and_then(Self::from_word)
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "verdadeiro" | "true" => Some(Self::True),
            "falso" | "false" => Some(Self::False),
            "duvidoso" | "uncertain" => Some(Self::Uncertain),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::True => "VERDADEIRO✅",
            Self::False => "FALSO🤥",
            Self::Uncertain => "DUVIDOSO🫤",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_portuguese_labels() {
        assert_eq!(Verdict::detect("Resultado: VERDADEIRO✅"), Some(Verdict::True));
        assert_eq!(Verdict::detect("A notícia é FALSO🤥 porque..."), Some(Verdict::False));
        assert_eq!(Verdict::detect("duvidoso, faltam fontes"), Some(Verdict::Uncertain));
    }

    #[test]
    fn test_detects_english_labels() {
        assert_eq!(Verdict::detect("Verdict: FALSE"), Some(Verdict::False));
        assert_eq!(Verdict::detect("uncertain"), Some(Verdict::Uncertain));
    }

    #[test]
    fn test_first_label_wins() {
        let text = "Classificação: FALSO🤥. A notícia não pode ser considerada verdadeiro.";
        assert_eq!(Verdict::detect(text), Some(Verdict::False));
    }

    #[test]
    fn test_marked_label_beats_earlier_negated_mention() {
        let text = "O texto não pode ser considerado verdadeiro. Classificação: FALSO🤥";
        assert_eq!(Verdict::detect(text), Some(Verdict::False));

        let text = "Não há indícios de que seja falso, mas faltam fontes.\n\nDUVIDOSO🫤";
        assert_eq!(Verdict::detect(text), Some(Verdict::Uncertain));
    }

    #[test]
    fn test_heading_label_beats_earlier_mention() {
        let text = "Seria falso afirmar o contrário.\nClassificação final: **VERDADEIRO**";
        assert_eq!(Verdict::detect(text), Some(Verdict::True));
    }

    #[test]
    fn test_requires_whole_word() {
        assert_eq!(Verdict::detect("falsos rumores circulam"), None);
        assert_eq!(Verdict::detect("nenhum rótulo aqui"), None);
    }
}
