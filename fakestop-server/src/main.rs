use clap::Parser;
use fakestop_core::{Analyzer, FakestopConfig};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "FAKESTOP web front end", long_about = None)]
struct Args {
    #[arg(short, long, env = "FAKESTOP_CONFIG", default_value = "fakestop.toml")]
    config: String,

    /// Check database connectivity and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (OPENAI_API_KEY usually lives there in development)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match FakestopConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging; RUST_LOG wins over [service] log_level
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .init();

    if args.health {
        let pool = match fakestop_core::db::create_pool(&config.database).await {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Database connection failed: {}", e);
                std::process::exit(1);
            }
        };
        match fakestop_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ SQLite connected: {} ({})", v, config.database.url),
            Err(e) => {
                println!("❌ SQLite check failed: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let analyzer = match Analyzer::from_config(&config).await {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Failed to initialize: {}", e);
            std::process::exit(1);
        }
    };

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    let addr = format!("{}:{}", config.http.host, config.http.port);
    fakestop_server::http::start_http_server(analyzer, &addr, tx.subscribe()).await?;

    Ok(())
}
