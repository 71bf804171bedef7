use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::IteratorRandom;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    CompletedGameRepository, GameInProgressRepository, PlayerRepository, Store, StoreResult,
    UnitOfWork, WordRepository,
};
use crate::{
    error::StoreError,
    game::is_playable_word,
    models::{CompletedGame, GameInProgress, NewCompletedGame, NewGameInProgress, Player, Word},
};

/// Collections sit behind `Arc` so a unit of work copies a collection only
/// the first time it writes to it.
#[derive(Debug, Clone, Default)]
struct MemoryState {
    players: Arc<BTreeMap<i64, Player>>,
    words: Arc<BTreeMap<i64, Word>>,
    in_progress: Arc<BTreeMap<i64, GameInProgress>>,
    completed: Arc<Vec<CompletedGame>>,
    next_id: i64,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn word_text(&self, word_id: i64) -> StoreResult<String> {
        self.words
            .get(&word_id)
            .map(|word| word.text.clone())
            .ok_or(StoreError::MissingWord(word_id))
    }
}

/// Process-local store.
///
/// A unit of work holds the lock for its whole lifetime and edits a copy of
/// the state, so operations are serialised and all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_player(&self, name: &str) -> Player {
        let mut state = self.state.lock().await;
        let player = Player {
            player_id: state.allocate_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        Arc::make_mut(&mut state.players).insert(player.player_id, player.clone());
        player
    }

    /// Add a word to the pool. Words that could never be fully guessed are rejected.
    pub async fn add_word(&self, text: &str) -> StoreResult<Word> {
        if !is_playable_word(text) {
            return Err(StoreError::InvalidWord(text.to_string()));
        }

        let mut state = self.state.lock().await;
        let word = Word {
            word_id: state.allocate_id(),
            text: text.to_uppercase(),
            used: false,
        };
        Arc::make_mut(&mut state.words).insert(word.word_id, word.clone());
        Ok(word)
    }

    pub async fn word(&self, word_id: i64) -> Option<Word> {
        self.state.lock().await.words.get(&word_id).cloned()
    }

    pub async fn active_games(&self, player_id: i64) -> Vec<GameInProgress> {
        self.state
            .lock()
            .await
            .in_progress
            .values()
            .filter(|game| game.player_id == player_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl PlayerRepository for MemoryUnitOfWork {
    async fn find_player(&mut self, player_id: i64) -> StoreResult<Option<Player>> {
        Ok(self.working.players.get(&player_id).cloned())
    }
}

#[async_trait]
impl WordRepository for MemoryUnitOfWork {
    async fn find_random_unused_word(&mut self) -> StoreResult<Option<Word>> {
        let mut rng = rand::rng();
        Ok(self
            .working
            .words
            .values()
            .filter(|word| !word.used)
            .choose(&mut rng)
            .cloned())
    }

    async fn mark_word_used(&mut self, word_id: i64) -> StoreResult<()> {
        let word = Arc::make_mut(&mut self.working.words)
            .get_mut(&word_id)
            .ok_or(StoreError::MissingWord(word_id))?;
        word.used = true;
        Ok(())
    }
}

#[async_trait]
impl GameInProgressRepository for MemoryUnitOfWork {
    async fn find_most_recent_active(
        &mut self,
        player_id: i64,
    ) -> StoreResult<Option<GameInProgress>> {
        Ok(self
            .working
            .in_progress
            .values()
            .filter(|game| game.player_id == player_id)
            .max_by_key(|game| (game.started_at, game.game_id))
            .cloned())
    }

    async fn count_active(&mut self, player_id: i64) -> StoreResult<i64> {
        Ok(self
            .working
            .in_progress
            .values()
            .filter(|game| game.player_id == player_id)
            .count() as i64)
    }

    async fn create_game_in_progress(
        &mut self,
        game: &NewGameInProgress,
    ) -> StoreResult<GameInProgress> {
        let word = self.working.word_text(game.word_id)?;

        let created = GameInProgress {
            game_id: self.working.allocate_id(),
            player_id: game.player_id,
            word_id: game.word_id,
            word,
            attempted_letters: String::new(),
            remaining_attempts: game.remaining_attempts,
            started_at: game.started_at,
        };
        Arc::make_mut(&mut self.working.in_progress).insert(created.game_id, created.clone());
        Ok(created)
    }

    async fn update_game_in_progress(&mut self, game: &GameInProgress) -> StoreResult<()> {
        if let Some(stored) = Arc::make_mut(&mut self.working.in_progress).get_mut(&game.game_id) {
            stored.attempted_letters = game.attempted_letters.clone();
            stored.remaining_attempts = game.remaining_attempts;
        }
        Ok(())
    }

    async fn delete_game_in_progress(&mut self, game_id: i64) -> StoreResult<()> {
        Arc::make_mut(&mut self.working.in_progress).remove(&game_id);
        Ok(())
    }
}

#[async_trait]
impl CompletedGameRepository for MemoryUnitOfWork {
    async fn save_completed_game(&mut self, game: &NewCompletedGame) -> StoreResult<CompletedGame> {
        let word = self.working.word_text(game.word_id)?;

        let completed = CompletedGame {
            game_id: self.working.allocate_id(),
            player_id: game.player_id,
            word_id: game.word_id,
            word,
            outcome: game.outcome,
            score: game.score,
            finished_at: game.finished_at,
        };
        Arc::make_mut(&mut self.working.completed).push(completed.clone());
        Ok(completed)
    }

    async fn find_completed_by_player(&mut self, player_id: i64) -> StoreResult<Vec<CompletedGame>> {
        Ok(self
            .working
            .completed
            .iter()
            .filter(|game| game.player_id == player_id)
            .cloned()
            .collect())
    }

    async fn find_all_completed(&mut self) -> StoreResult<Vec<CompletedGame>> {
        Ok(self.working.completed.to_vec())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use tokio_test::assert_err;

    #[tokio::test]
    async fn test_uncommitted_changes_are_discarded() {
        let store = MemoryStore::new();
        let word = store.add_word("sol").await.unwrap();

        {
            let mut uow = store.begin().await.unwrap();
            uow.mark_word_used(word.word_id).await.unwrap();
        }

        assert!(!store.word(word.word_id).await.unwrap().used);
    }

    #[tokio::test]
    async fn test_committed_changes_are_visible() {
        let store = MemoryStore::new();
        let word = store.add_word("sol").await.unwrap();

        let mut uow = store.begin().await.unwrap();
        uow.mark_word_used(word.word_id).await.unwrap();
        uow.commit().await.unwrap();

        assert!(store.word(word.word_id).await.unwrap().used);
    }

    #[tokio::test]
    async fn test_random_word_skips_used_words() {
        let store = MemoryStore::new();
        let used = store.add_word("luna").await.unwrap();
        let fresh = store.add_word("sol").await.unwrap();

        let mut uow = store.begin().await.unwrap();
        uow.mark_word_used(used.word_id).await.unwrap();

        for _ in 0..20 {
            let picked = uow.find_random_unused_word().await.unwrap().unwrap();
            assert_eq!(picked.word_id, fresh.word_id);
        }

        uow.mark_word_used(fresh.word_id).await.unwrap();
        assert!(uow.find_random_unused_word().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_most_recent_active_game_wins() {
        let store = MemoryStore::new();
        let player = store.add_player("ana").await;
        let first = store.add_word("sol").await.unwrap();
        let second = store.add_word("luna").await.unwrap();
        let now = Utc::now();

        let mut uow = store.begin().await.unwrap();
        for (word, offset) in [(&first, 0), (&second, 5)] {
            uow.create_game_in_progress(&NewGameInProgress {
                player_id: player.player_id,
                word_id: word.word_id,
                remaining_attempts: 7,
                started_at: now + chrono::Duration::seconds(offset),
            })
            .await
            .unwrap();
        }

        let current = uow
            .find_most_recent_active(player.player_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.word, "LUNA");
        assert_eq!(uow.count_active(player.player_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_completed_games_are_filtered_by_player() {
        let store = MemoryStore::new();
        let ana = store.add_player("ana").await;
        let bruno = store.add_player("bruno").await;
        let word = store.add_word("sol").await.unwrap();

        let mut uow = store.begin().await.unwrap();
        for player in [&ana, &bruno, &ana] {
            uow.save_completed_game(&NewCompletedGame {
                player_id: player.player_id,
                word_id: word.word_id,
                outcome: Outcome::Lost,
                score: 0,
                finished_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        assert_eq!(uow.find_completed_by_player(ana.player_id).await.unwrap().len(), 2);
        assert_eq!(uow.find_all_completed().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_unguessable_words_are_rejected() {
        let store = MemoryStore::new();

        for text in ["", "pez-espada", "dos palabras", "r2d2"] {
            let err = assert_err!(store.add_word(text).await);
            assert!(matches!(err, StoreError::InvalidWord(_)));
        }

        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_random_unused_word().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_word_ids_are_errors() {
        let store = MemoryStore::new();
        let player = store.add_player("ana").await;

        let mut uow = store.begin().await.unwrap();
        let err = assert_err!(
            uow.create_game_in_progress(&NewGameInProgress {
                player_id: player.player_id,
                word_id: 404,
                remaining_attempts: 7,
                started_at: Utc::now(),
            })
            .await
        );
        assert!(matches!(err, StoreError::MissingWord(404)));

        let err = assert_err!(uow.mark_word_used(404).await);
        assert!(matches!(err, StoreError::MissingWord(404)));

        let err = assert_err!(
            uow.save_completed_game(&NewCompletedGame {
                player_id: player.player_id,
                word_id: 404,
                outcome: Outcome::Won,
                score: 20,
                finished_at: Utc::now(),
            })
            .await
        );
        assert!(matches!(err, StoreError::MissingWord(404)));
    }

    #[tokio::test]
    async fn test_commit_keeps_untouched_collections_shared() {
        let store = MemoryStore::new();
        let player = store.add_player("ana").await;
        let word = store.add_word("sol").await.unwrap();

        let (words_before, completed_before) = {
            let state = store.state.lock().await;
            (state.words.clone(), state.completed.clone())
        };

        let mut uow = store.begin().await.unwrap();
        uow.create_game_in_progress(&NewGameInProgress {
            player_id: player.player_id,
            word_id: word.word_id,
            remaining_attempts: 7,
            started_at: Utc::now(),
        })
        .await
        .unwrap();
        uow.commit().await.unwrap();

        let state = store.state.lock().await;
        assert_eq!(state.in_progress.len(), 1);
        assert!(Arc::ptr_eq(&state.words, &words_before));
        assert!(Arc::ptr_eq(&state.completed, &completed_before));
    }
}
