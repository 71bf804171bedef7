use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    db::{self, PgStore},
    error::StoreError,
    models::{CompletedGame, GameInProgress, NewCompletedGame, NewGameInProgress, Player, Word},
};

pub mod memory;

pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PlayerRepository: Send {
    async fn find_player(&mut self, player_id: i64) -> StoreResult<Option<Player>>;
}

#[async_trait]
pub trait WordRepository: Send {
    /// Pick one unused word uniformly at random
    async fn find_random_unused_word(&mut self) -> StoreResult<Option<Word>>;

    async fn mark_word_used(&mut self, word_id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait GameInProgressRepository: Send {
    /// Most recently started active game for the player, if any
    async fn find_most_recent_active(&mut self, player_id: i64)
        -> StoreResult<Option<GameInProgress>>;

    async fn count_active(&mut self, player_id: i64) -> StoreResult<i64>;

    async fn create_game_in_progress(
        &mut self,
        game: &NewGameInProgress,
    ) -> StoreResult<GameInProgress>;

    /// Persist the attempted letters and remaining attempts
    async fn update_game_in_progress(&mut self, game: &GameInProgress) -> StoreResult<()>;

    async fn delete_game_in_progress(&mut self, game_id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait CompletedGameRepository: Send {
    async fn save_completed_game(&mut self, game: &NewCompletedGame) -> StoreResult<CompletedGame>;

    async fn find_completed_by_player(&mut self, player_id: i64) -> StoreResult<Vec<CompletedGame>>;

    async fn find_all_completed(&mut self) -> StoreResult<Vec<CompletedGame>>;
}

/// All repositories scoped to one transaction.
///
/// Changes become visible only after [`UnitOfWork::commit`]; dropping the
/// unit of work discards them.
#[async_trait]
pub trait UnitOfWork:
    PlayerRepository + WordRepository + GameInProgressRepository + CompletedGameRepository
{
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}

/// Open the configured store: Postgres when a database URL is set, otherwise in-memory
pub async fn connect(config: &Config) -> StoreResult<Arc<dyn Store>> {
    match config.database_url() {
        Some(url) => {
            let pool = db::create_pool(url, config.database.max_connections).await?;
            tracing::info!("Connected to database");

            db::migrate(&pool).await?;
            tracing::info!("Database migrations completed");

            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("No database URL configured. Using in-memory store; games will not survive a restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
