//! HTML rendering for the form front end
//!
//! Two views share one layout: "analyze" (text box, run button, spinner while
//! the pipeline runs, then the four documents) and "history" (past analyses,
//! newest first, each collapsible). Every piece of stored or submitted text
//! goes through `escape_html`.

use fakestop_core::{AnalysisRecord, Stage};

/// Characters of the news text shown in a history entry's summary line.
pub const HISTORY_HEADLINE_CHARS: usize = 80;

pub const EMPTY_NEWS_MESSAGE: &str = "Por favor, insira uma notícia para analisar.";
pub const EMPTY_HISTORY_MESSAGE: &str = "Nenhuma análise realizada ainda.";
pub const SUCCESS_MESSAGE: &str = "✅ Análise concluída com sucesso!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Analyze,
    History,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
nav { width: 14rem; background: #f0f2f6; padding: 1.5rem 1rem; }
nav a { display: block; padding: .5rem; color: #31333f; text-decoration: none; border-radius: .3rem; }
nav a.active { background: #dfe3ea; font-weight: 600; }
main { flex: 1; padding: 2rem 3rem; max-width: 60rem; }
textarea { width: 100%; height: 200px; font: inherit; padding: .5rem; }
button { margin-top: .8rem; padding: .5rem 1.2rem; font: inherit; cursor: pointer; }
.error { background: #ffe5e5; color: #8a1c1c; padding: .8rem; border-radius: .3rem; }
.success { background: #e3f6e8; color: #17612c; padding: .8rem; border-radius: .3rem; }
.info { background: #e6f0fb; color: #1c4e8a; padding: .8rem; border-radius: .3rem; }
.doc { white-space: pre-wrap; font: inherit; margin: .5rem 0 1rem; }
details { border: 1px solid #dfe3ea; border-radius: .3rem; padding: .5rem .8rem; margin: .6rem 0; }
summary { cursor: pointer; font-weight: 600; }
#spinner { display: none; margin-top: .8rem; }
#spinner.visible { display: block; }
"#;

const SPINNER_SCRIPT: &str = r#"
document.getElementById('analyze-form').addEventListener('submit', function () {
  document.getElementById('spinner').classList.add('visible');
  document.getElementById('run').disabled = true;
});
"#;

pub fn layout(title: &str, active: View, body: &str) -> String {
    let tab = |view: View, href: &str, label: &str| {
        let class = if view == active { " class=\"active\"" } else { "" };
        format!("<a href=\"{}\"{}>{}</a>", href, class, label)
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} · FAKESTOP</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav>\n<p><strong>Escolha uma opção</strong></p>\n{analyze}\n{history}\n</nav>\n\
         <main>\n<h1>🛡️ FAKESTOP - Verificador de Notícias</h1>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
        analyze = tab(View::Analyze, "/analyze", "🔍 Analisar nova notícia"),
        history = tab(View::History, "/history", "📚 Ver histórico"),
    )
}

fn document(text: &str) -> String {
    format!("<div class=\"doc\">{}</div>", escape_html(text))
}

fn section(title: &str, text: &str, open: bool) -> String {
    format!(
        "<details{}>\n<summary>{}</summary>\n{}\n</details>",
        if open { " open" } else { "" },
        escape_html(title),
        document(text)
    )
}

fn verdict_line(record: &AnalysisRecord) -> String {
    match record.verdict() {
        Some(v) => format!("<p><strong>Veredito detectado:</strong> {}</p>", escape_html(v.label())),
        None => String::new(),
    }
}

/// Classification up front, the other three documents collapsible.
fn record_body(record: &AnalysisRecord) -> String {
    format!(
        "<h2>📌 {classification_title}</h2>\n{verdict}\n{classification}\n{sources}\n{linguistic}\n{verification}",
        classification_title = Stage::Classifier.title(),
        verdict = verdict_line(record),
        classification = document(&record.classificacao_final),
        sources = section(&format!("📂 {}", Stage::Collector.title()), &record.fontes, false),
        linguistic = section(
            &format!("📝 {}", Stage::Linguist.title()),
            &record.analise_linguistica,
            false
        ),
        verification = section(
            &format!("🔎 {}", Stage::Verifier.title()),
            &record.verificacao_fatos,
            false
        ),
    )
}

fn analyze_form(value: &str) -> String {
    format!(
        "<form id=\"analyze-form\" method=\"post\" action=\"/analyze\">\n\
         <label for=\"noticia\">Digite a notícia que deseja verificar</label>\n\
         <textarea id=\"noticia\" name=\"noticia\">{}</textarea>\n\
         <button id=\"run\" type=\"submit\">Analisar notícia</button>\n\
         <div id=\"spinner\">🔎 Executando análise...</div>\n\
         </form>\n<script>{}</script>",
        escape_html(value),
        SPINNER_SCRIPT
    )
}

/// The "new analysis" view, optionally with an error above the form.
pub fn analyze_page(error: Option<&str>, value: &str) -> String {
    let error = error
        .map(|e| format!("<div class=\"error\">{}</div>\n", escape_html(e)))
        .unwrap_or_default();
    layout("Analisar", View::Analyze, &format!("{}{}", error, analyze_form(value)))
}

/// The "new analysis" view after a successful run.
pub fn analysis_result_page(record: &AnalysisRecord) -> String {
    let body = format!(
        "{form}\n<div class=\"success\">{success}</div>\n{record}",
        form = analyze_form(&record.noticia),
        success = escape_html(SUCCESS_MESSAGE),
        record = record_body(record),
    );
    layout("Resultado", View::Analyze, &body)
}

pub fn history_page(records: &[AnalysisRecord]) -> String {
    if records.is_empty() {
        let body = format!("<div class=\"info\">{}</div>", escape_html(EMPTY_HISTORY_MESSAGE));
        return layout("Histórico", View::History, &body);
    }

    let entries: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "<details id=\"analise-{id}\">\n<summary>📰 {headline} ({date})</summary>\n\
                 {body}\n<p><a href=\"/history/{id}\">Link permanente</a></p>\n</details>",
                id = r.id,
                headline = escape_html(&r.headline(HISTORY_HEADLINE_CHARS)),
                date = escape_html(&r.data_analise),
                body = record_body(r),
            )
        })
        .collect();

    layout("Histórico", View::History, &entries.join("\n"))
}

pub fn history_entry_page(record: &AnalysisRecord) -> String {
    let body = format!(
        "<h2>📰 Análise #{id} ({date})</h2>\n{news}\n{record}\n<p><a href=\"/history\">← Voltar ao histórico</a></p>",
        id = record.id,
        date = escape_html(&record.data_analise),
        news = section("Notícia analisada", &record.noticia, true),
        record = record_body(record),
    );
    layout(&format!("Análise #{}", record.id), View::History, &body)
}

pub fn error_page(active: View, message: &str) -> String {
    let body = format!("<div class=\"error\">{}</div>", escape_html(message));
    layout("Erro", active, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, noticia: &str) -> AnalysisRecord {
        AnalysisRecord {
            id,
            noticia: noticia.to_string(),
            fontes: "<script>alert(1)</script>".to_string(),
            analise_linguistica: "Tom neutro".to_string(),
            verificacao_fatos: "Confirmado por \"BBC\"".to_string(),
            classificacao_final: "VERDADEIRO✅ & justificado".to_string(),
            data_analise: "2026-10-16 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("ação ✅"), "ação ✅");
    }

    #[test]
    fn test_stored_text_is_escaped() {
        let html = history_entry_page(&record(3, "notícia"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("VERDADEIRO✅ &amp; justificado"));
    }

    #[test]
    fn test_analyze_page_shows_error_and_keeps_value() {
        let html = analyze_page(Some(EMPTY_NEWS_MESSAGE), "  ");
        assert!(html.contains(EMPTY_NEWS_MESSAGE));
        assert!(html.contains("name=\"noticia\""));
        assert!(html.contains("id=\"spinner\""));
    }

    #[test]
    fn test_history_sections_are_collapsible() {
        let html = history_page(&[record(2, "segunda"), record(1, "primeira")]);
        // one outer <details> per record plus three inner document sections each
        assert_eq!(html.matches("<details").count(), 8);
        assert!(html.contains("Fontes Coletadas"));
        assert!(html.find("segunda").unwrap() < html.find("primeira").unwrap());
    }

    #[test]
    fn test_history_headline_is_truncated() {
        let long = "A".repeat(120);
        let html = history_page(&[record(1, &long)]);
        assert!(html.contains(&format!("📰 {}... (2026-10-16 10:00:00)", "A".repeat(80))));
    }

    #[test]
    fn test_empty_history_message() {
        let html = history_page(&[]);
        assert!(html.contains(EMPTY_HISTORY_MESSAGE));
    }

    #[test]
    fn test_result_page_has_all_documents() {
        let r = record(9, "nova");
        let html = analysis_result_page(&r);
        assert!(html.contains(SUCCESS_MESSAGE));
        assert!(html.contains("Tom neutro"));
        assert!(html.contains("Confirmado por &quot;BBC&quot;"));
        assert!(html.contains("Veredito detectado"));
    }
}
