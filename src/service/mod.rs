use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    error::GameError,
    game::{normalize_letter, HangmanGame, LetterSet, MAX_ATTEMPTS},
    models::{GameInProgress, NewCompletedGame, NewGameInProgress, Outcome, Player},
    store::{Store, UnitOfWork},
};

pub mod responses;

pub use responses::{GameResult, GameSummary};

/// Coordinates game operations against the store.
///
/// Each operation runs in a single unit of work and commits only on success.
/// Guesses from the same player are serialised in-process.
pub struct GameService {
    store: Arc<dyn Store>,
    player_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl GameService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            player_locks: DashMap::new(),
        }
    }

    /// Start a new game with a random unused word
    #[tracing::instrument(skip(self))]
    pub async fn start_game(&self, player_id: i64) -> Result<GameResult, GameError> {
        let _guard = self.lock_player(player_id).await;

        let mut uow = self.store.begin().await?;
        let player = find_player(uow.as_mut(), player_id).await?;

        let word = uow
            .find_random_unused_word()
            .await?
            .ok_or(GameError::WordsExhausted)?;

        // Burned even if this game is later abandoned
        uow.mark_word_used(word.word_id).await?;

        let stale = uow.count_active(player_id).await?;
        if stale > 0 {
            tracing::warn!(
                "Player {} starting a new game with {} game(s) still in progress",
                player_id,
                stale
            );
        }

        let record = uow
            .create_game_in_progress(&NewGameInProgress {
                player_id: player.player_id,
                word_id: word.word_id,
                remaining_attempts: MAX_ATTEMPTS,
                started_at: Utc::now(),
            })
            .await?;

        uow.commit().await?;

        tracing::info!(
            "Player {} ({}) started game {}",
            player.name,
            player.player_id,
            record.game_id
        );

        Ok(GameResult::in_progress(&restore(&record)))
    }

    /// Apply a guessed letter to the player's current game
    #[tracing::instrument(skip(self))]
    pub async fn make_guess(&self, player_id: i64, letter: char) -> Result<GameResult, GameError> {
        let letter = normalize_letter(letter).ok_or(GameError::InvalidLetter(letter))?;

        let _guard = self.lock_player(player_id).await;

        let mut uow = self.store.begin().await?;
        let player = find_player(uow.as_mut(), player_id).await?;

        let mut record = uow
            .find_most_recent_active(player_id)
            .await?
            .ok_or(GameError::NoActiveGame(player_id))?;

        let mut game = restore(&record);
        let guess = game.guess(letter)?;
        tracing::debug!("Game {}: guess {} -> {:?}", record.game_id, letter, guess);

        if !guess.changed_state() {
            return Ok(GameResult::in_progress(&game));
        }

        let result = match game.state().outcome() {
            Some(outcome) => {
                finish_game(uow.as_mut(), &player, &record, &game, outcome).await?;
                GameResult::finished(&game, outcome)
            }
            None => {
                record.attempted_letters = game.attempted().encode();
                record.remaining_attempts = game.remaining_attempts();
                uow.update_game_in_progress(&record).await?;
                GameResult::in_progress(&game)
            }
        };

        uow.commit().await?;
        Ok(result)
    }

    /// Completed games for one player
    pub async fn list_games_by_player(&self, player_id: i64) -> Result<Vec<GameSummary>, GameError> {
        let mut uow = self.store.begin().await?;
        let games = uow.find_completed_by_player(player_id).await?;
        Ok(games.iter().map(GameSummary::from).collect())
    }

    pub async fn list_all_games(&self) -> Result<Vec<GameSummary>, GameError> {
        let mut uow = self.store.begin().await?;
        let games = uow.find_all_completed().await?;
        Ok(games.iter().map(GameSummary::from).collect())
    }

    async fn lock_player(&self, player_id: i64) -> PlayerGuard<'_> {
        let lock = self
            .player_locks
            .entry(player_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        PlayerGuard {
            locks: &self.player_locks,
            player_id,
            guard: Some(lock.lock_owned().await),
        }
    }
}

/// Exclusive access to one player's games. The lock entry is removed when the
/// last holder lets go, so the map only holds players with operations in flight.
struct PlayerGuard<'a> {
    locks: &'a DashMap<i64, Arc<Mutex<()>>>,
    player_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PlayerGuard<'_> {
    fn drop(&mut self) {
        // Release our reference before checking for other holders
        self.guard.take();
        self.locks.remove_if(&self.player_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

async fn find_player(uow: &mut dyn UnitOfWork, player_id: i64) -> Result<Player, GameError> {
    uow.find_player(player_id)
        .await?
        .ok_or(GameError::PlayerNotFound(player_id))
}

fn restore(record: &GameInProgress) -> HangmanGame {
    HangmanGame::resume(
        &record.word,
        LetterSet::decode(&record.attempted_letters),
        record.remaining_attempts,
    )
}

/// Record the outcome and drop the in-progress game
async fn finish_game(
    uow: &mut dyn UnitOfWork,
    player: &Player,
    record: &GameInProgress,
    game: &HangmanGame,
    outcome: Outcome,
) -> Result<(), GameError> {
    uow.mark_word_used(record.word_id).await?;

    let completed = uow
        .save_completed_game(&NewCompletedGame {
            player_id: player.player_id,
            word_id: record.word_id,
            outcome,
            score: game.score(),
            finished_at: Utc::now(),
        })
        .await?;

    uow.delete_game_in_progress(record.game_id).await?;

    tracing::info!(
        "Player {} ({}) finished game {}: {:?} with {} point(s)",
        player.name,
        player.player_id,
        record.game_id,
        completed.outcome,
        completed.score
    );

    Ok(())
}
