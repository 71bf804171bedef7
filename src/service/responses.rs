use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    game::HangmanGame,
    models::{CompletedGame, Outcome},
};

/// State of a game returned after every start or guess
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub hidden_word: String,
    pub attempted_letters: Vec<char>,
    pub remaining_attempts: i32,
    /// True only when the word was fully revealed
    pub complete: bool,
    pub score: i32,
    /// `None` while the game is still running
    pub outcome: Option<Outcome>,
}

impl GameResult {
    /// Snapshot of a running game (also used for repeated guesses)
    pub fn in_progress(game: &HangmanGame) -> Self {
        Self {
            hidden_word: game.hidden_word(),
            attempted_letters: game.attempted().iter().collect(),
            remaining_attempts: game.remaining_attempts(),
            complete: game.is_complete(),
            score: game.score(),
            outcome: game.state().outcome(),
        }
    }

    /// Final result. The word is shown in full whether the game was won or lost.
    pub fn finished(game: &HangmanGame, outcome: Outcome) -> Self {
        Self {
            hidden_word: game.word().to_string(),
            outcome: Some(outcome),
            ..Self::in_progress(game)
        }
    }
}

/// Read-only projection of a completed game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: i64,
    pub player_id: i64,
    pub word: String,
    pub outcome: Outcome,
    pub score: i32,
    pub finished_at: DateTime<Utc>,
}

impl From<&CompletedGame> for GameSummary {
    fn from(game: &CompletedGame) -> Self {
        Self {
            game_id: game.game_id,
            player_id: game.player_id,
            word: game.word.clone(),
            outcome: game.outcome,
            score: game.score,
            finished_at: game.finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::LetterSet;

    #[test]
    fn test_result_wire_shape() {
        let game = HangmanGame::resume("GATO", LetterSet::decode("G,Z"), 6);
        let json = serde_json::to_value(GameResult::in_progress(&game)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "hidden_word": "G___",
                "attempted_letters": ["G", "Z"],
                "remaining_attempts": 6,
                "complete": false,
                "score": 0,
                "outcome": null,
            })
        );
    }

    #[test]
    fn test_finished_result_reveals_word_on_loss() {
        let game = HangmanGame::resume("SOL", LetterSet::decode("S,A,B,C,D,E,F,G"), 0);
        let result = GameResult::finished(&game, Outcome::Lost);

        assert_eq!(result.hidden_word, "SOL");
        assert!(!result.complete);
        assert_eq!(result.score, 1);
        assert_eq!(result.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn test_summary_copies_completed_game() {
        let finished_at = Utc::now();
        let game = CompletedGame {
            game_id: 9,
            player_id: 3,
            word_id: 4,
            word: "GATO".to_string(),
            outcome: Outcome::Won,
            score: 20,
            finished_at,
        };

        let summary = GameSummary::from(&game);
        assert_eq!(summary.game_id, 9);
        assert_eq!(summary.player_id, 3);
        assert_eq!(summary.word, "GATO");
        assert_eq!(summary.outcome, Outcome::Won);
        assert_eq!(summary.finished_at, finished_at);
        assert_eq!(serde_json::to_value(summary.outcome).unwrap(), "WON");
    }
}
