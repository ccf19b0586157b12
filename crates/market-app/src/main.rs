use market_hex::application::market_service::MarketService;
use market_hex::config::Config;
use market_hex::inbound::http::{HttpServer, HttpServerConfig};
use market_repo::{build_repo, seed_repo, Repo, SeedData};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for SERVER_PORT / DATABASE_URL / SEED_FILE when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let repo: Repo = build_repo(config.database_url.as_deref()).await?;
    tracing::info!(backend = repo.backend(), "store ready");

    let seed = SeedData::load(config.seed_file.as_deref()).await?;
    seed_repo(&repo, seed).await?;

    let service = MarketService::new(repo);
    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
