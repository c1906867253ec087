//! Vault server binary
//!
//! Run with: cargo run -p studyvault --bin studyvault-server

use studyvault::{config::AppConfig, server::VaultServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyvault=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::default();

    tracing::info!(
        embed_model = config.gemini.embed_model,
        generate_model = config.gemini.generate_model,
        dimensions = config.gemini.dimensions,
        chunk_size = config.chunking.chunk_size,
        backend = ?config.vector_index.backend,
        data_dir = %config.storage.data_dir.display(),
        "Configuration loaded"
    );
    if config.gemini.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; summaries and chat will degrade to placeholders");
    }

    let server = VaultServer::new(config)?;
    println!("StudyVault listening on http://{}", server.address());
    println!("  upload:   POST {}/api/files", server.address());
    println!("  sessions: POST {}/api/sessions", server.address());
    println!("  chat:     POST {}/api/chat", server.address());

    server.start().await?;
    Ok(())
}
