use anyhow::Result;
use hangman_backend::{logging, store, Config, GameService};

/// Prepare the configured store (runs migrations for Postgres) and report its contents
#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    logging::init(&config.log)?;

    tracing::info!("Starting hangman backend...");

    let store = store::connect(&config).await?;
    let service = GameService::new(store);

    let games = service.list_all_games().await?;
    tracing::info!("Store ready with {} completed game(s)", games.len());

    Ok(())
}
