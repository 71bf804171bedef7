use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Result, Transaction};

use crate::{
    error::StoreError,
    models::{CompletedGame, GameInProgress, NewCompletedGame, NewGameInProgress, Player, Word},
    store::{
        CompletedGameRepository, GameInProgressRepository, PlayerRepository, Store, StoreResult,
        UnitOfWork, WordRepository,
    },
};

pub mod queries;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn migrate(pool: &PgPool) -> std::result::Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Postgres-backed store. Every unit of work is one database transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PlayerRepository for PgUnitOfWork {
    async fn find_player(&mut self, player_id: i64) -> StoreResult<Option<Player>> {
        Ok(queries::get_player(&mut *self.tx, player_id).await?)
    }
}

#[async_trait]
impl WordRepository for PgUnitOfWork {
    async fn find_random_unused_word(&mut self) -> StoreResult<Option<Word>> {
        Ok(queries::get_random_unused_word(&mut *self.tx).await?)
    }

    async fn mark_word_used(&mut self, word_id: i64) -> StoreResult<()> {
        Ok(queries::mark_word_used(&mut *self.tx, word_id).await?)
    }
}

#[async_trait]
impl GameInProgressRepository for PgUnitOfWork {
    async fn find_most_recent_active(
        &mut self,
        player_id: i64,
    ) -> StoreResult<Option<GameInProgress>> {
        Ok(queries::get_most_recent_game_in_progress(&mut *self.tx, player_id).await?)
    }

    async fn count_active(&mut self, player_id: i64) -> StoreResult<i64> {
        Ok(queries::count_games_in_progress(&mut *self.tx, player_id).await?)
    }

    async fn create_game_in_progress(
        &mut self,
        game: &NewGameInProgress,
    ) -> StoreResult<GameInProgress> {
        Ok(queries::create_game_in_progress(&mut *self.tx, game).await?)
    }

    async fn update_game_in_progress(&mut self, game: &GameInProgress) -> StoreResult<()> {
        Ok(queries::update_game_in_progress(&mut *self.tx, game).await?)
    }

    async fn delete_game_in_progress(&mut self, game_id: i64) -> StoreResult<()> {
        Ok(queries::delete_game_in_progress(&mut *self.tx, game_id).await?)
    }
}

#[async_trait]
impl CompletedGameRepository for PgUnitOfWork {
    async fn save_completed_game(&mut self, game: &NewCompletedGame) -> StoreResult<CompletedGame> {
        Ok(queries::create_completed_game(&mut *self.tx, game).await?)
    }

    async fn find_completed_by_player(&mut self, player_id: i64) -> StoreResult<Vec<CompletedGame>> {
        Ok(queries::get_completed_games_for_player(&mut *self.tx, player_id).await?)
    }

    async fn find_all_completed(&mut self) -> StoreResult<Vec<CompletedGame>> {
        Ok(queries::get_all_completed_games(&mut *self.tx).await?)
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
