use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Won,
    Lost,
}

/// Mutable record of an unfinished game.
///
/// `word` is the joined word text; `attempted_letters` is the comma-joined
/// encoding produced by [`crate::game::LetterSet`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GameInProgress {
    pub game_id: i64,
    pub player_id: i64,
    pub word_id: i64,
    pub word: String,
    pub attempted_letters: String,
    pub remaining_attempts: i32,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGameInProgress {
    pub player_id: i64,
    pub word_id: i64,
    pub remaining_attempts: i32,
    pub started_at: DateTime<Utc>,
}

/// Immutable record of a finished game
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletedGame {
    pub game_id: i64,
    pub player_id: i64,
    pub word_id: i64,
    pub word: String,
    pub outcome: Outcome,
    pub score: i32,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCompletedGame {
    pub player_id: i64,
    pub word_id: i64,
    pub outcome: Outcome,
    pub score: i32,
    pub finished_at: DateTime<Utc>,
}
