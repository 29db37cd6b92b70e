//! Answer server binary
//!
//! Run with: cargo run -p cupid-rag --bin cupid-rag-server -- --config cupid-rag.toml

use clap::Parser;
use cupid_rag::{config::RagConfig, error::Error, generation::OllamaClient, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "cupid-rag-server", version, about = "Dating-advice answer service")]
struct Cli {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config and environment)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config and environment)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cupid_rag=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Corpus: {}", config.knowledge.corpus_path.display());
    tracing::info!("  - Index snapshot: {}", config.knowledge.index_path.display());
    tracing::info!("  - Match service: {}", config.matching.url);

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let ollama = OllamaClient::new(&config.llm)?;
    match ollama.health_check().await {
        Ok(true) => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!(
                "  Start it with `ollama serve`, then pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    let server = match RagServer::new(config).await {
        Ok(server) => server,
        Err(e @ Error::IndexUnavailable(_)) => {
            tracing::error!("Cannot start without a knowledge index: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("Listening on http://{}", server.address());
    tracing::info!("  POST /answer    - Ask a question");
    tracing::info!("  POST /feedback  - Rate an answer");
    tracing::info!("  GET  /stats     - Index and cache statistics");

    server.start().await?;

    Ok(())
}
