use anyhow::{Context, Result};
use clap::Parser;
use reelcutter::analysis::{AnalysisPipeline, LlmClient};
use reelcutter::session::SessionStore;
use reelcutter::transcribe::ProviderChain;
use reelcutter::{create_router, AppState, Config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "reelcutter", about = "Video repurposing analysis server")]
struct Args {
    /// Config file (without extension), resolved by the config crate
    #[arg(long, default_value = "config/reelcutter")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let upload_dir = PathBuf::from(&cfg.storage.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .with_context(|| format!("failed to create upload dir {}", upload_dir.display()))?;

    let store = SessionStore::new();
    let chain = Arc::new(ProviderChain::from_config(&cfg.transcription));
    let llm = Arc::new(LlmClient::new(cfg.llm.clone(), upload_dir.clone()));
    let pipeline = Arc::new(AnalysisPipeline::new(store.clone(), llm));

    let state = AppState {
        store,
        chain,
        pipeline,
        upload_dir,
    };

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
