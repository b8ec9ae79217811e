//! fakestop - console front end for the FAKESTOP news verifier
//!
//! Asks for one news text, runs the four-stage pipeline and prints the fact
//! verification report followed by the final classification.
//!
//! # Subcommands
//! - (none)      - interactive: prompt, analyze, print
//! - `history`   - list stored analyses, newest first
//! - `show <id>` - print the four documents of one stored analysis

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use fakestop_core::{
    AnalysisDocuments, AnalysisRecord, AnalysisStore, Analyzer, FakestopConfig, FakestopError,
    Stage,
};
use tracing_subscriber::{fmt, EnvFilter};

const PROMPT: &str = "Informe a notícia que deseja verificar: ";
const HISTORY_HEADLINE_CHARS: usize = 60;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "fakestop",
    version,
    about = "FAKESTOP: checks a news text against sources and classifies it"
)]
struct Cli {
    /// Path to the TOML config file (overrides FAKESTOP_CONFIG env var)
    #[arg(short, long, env = "FAKESTOP_CONFIG", default_value = "fakestop.toml")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List past analyses, newest first
    History,

    /// Print the stored documents of one analysis
    Show {
        /// Analysis id as shown by `history`
        id: i64,
    },
}

// ============================================================================
// Output formatting
// ============================================================================

/// Section banner in the console's dashed style.
pub fn banner(title: &str) -> String {
    let rule = "-".repeat(title.chars().count() + 12);
    format!("{rule}\n\n----- {} -----\n\n{rule}", title.to_uppercase())
}

/// The two documents printed after an interactive run.
pub fn render_result(record: &AnalysisRecord) -> String {
    format!(
        "{}\n{}\n\n{}\n{}\n",
        banner("Verificação dos Fatos"),
        record.verificacao_fatos,
        banner("Classificação Final da Notícia"),
        record.classificacao_final,
    )
}

/// One line per record: id, date, detected verdict, headline.
pub fn history_line(record: &AnalysisRecord) -> String {
    let verdict = record.verdict().map(|v| v.label()).unwrap_or("?");
    format!(
        "#{:<4} {}  {:<12} {}",
        record.id,
        record.data_analise,
        verdict,
        record.headline(HISTORY_HEADLINE_CHARS).replace('\n', " ")
    )
}

pub fn render_documents(id: i64, docs: &AnalysisDocuments) -> String {
    let sections = [
        (Stage::Collector, &docs.fontes),
        (Stage::Linguist, &docs.analise_linguistica),
        (Stage::Verifier, &docs.verificacao_fatos),
        (Stage::Classifier, &docs.classificacao_final),
    ];

    let mut out = format!("Análise #{}\n\n", id);
    for (stage, text) in sections {
        out.push_str(&banner(stage.title()));
        out.push('\n');
        out.push_str(text);
        out.push_str("\n\n");
    }
    out
}

// ============================================================================
// Commands
// ============================================================================

fn read_news() -> anyhow::Result<String> {
    print!("{}", PROMPT);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn do_analyze(config: &FakestopConfig) -> anyhow::Result<()> {
    let news = read_news()?;

    // Reject before touching the database or the model
    if let Err(e) = fakestop_core::validate_news(&news) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let analyzer = Analyzer::from_config(config).await?;
    println!("\n🔎 Executando análise...\n");

    match analyzer.analyze(&news).await {
        Ok(record) => {
            print!("{}", render_result(&record));
            Ok(())
        }
        Err(e) => {
            eprintln!("fakestop: análise falhou: {}", e);
            std::process::exit(1);
        }
    }
}

async fn open_store(config: &FakestopConfig) -> Result<AnalysisStore, FakestopError> {
    let pool = fakestop_core::db::create_pool(&config.database).await?;
    let store = AnalysisStore::new(pool);
    store.initialize().await?;
    Ok(store)
}

async fn do_history(config: &FakestopConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let records = store.list_all().await?;

    if records.is_empty() {
        println!("Nenhuma análise realizada ainda.");
        return Ok(());
    }
    for record in &records {
        println!("{}", history_line(record));
    }
    Ok(())
}

async fn do_show(config: &FakestopConfig, id: i64) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    match store.get_by_id(id).await? {
        Some(docs) => {
            print!("{}", render_documents(id, &docs));
            Ok(())
        }
        None => {
            eprintln!("fakestop: {}", FakestopError::NotFound(id));
            std::process::exit(1);
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match FakestopConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("fakestop: failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    // Logs go to stderr so they never interleave with the printed documents
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .init();

    let result = match cli.command {
        None => do_analyze(&config).await,
        Some(Commands::History) => do_history(&config).await,
        Some(Commands::Show { id }) => do_show(&config, id).await,
    };

    if let Err(e) = result {
        eprintln!("fakestop: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
