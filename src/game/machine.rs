use serde::{Deserialize, Serialize};

use super::{renderer, LetterSet, Scorer};
use crate::{error::GameError, models::Outcome};

/// Attempts a player starts with
pub const MAX_ATTEMPTS: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GameState::InProgress => None,
            GameState::Won => Some(Outcome::Won),
            GameState::Lost => Some(Outcome::Lost),
        }
    }
}

/// What a single guess did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess {
    /// Letter was already attempted; nothing changed
    Repeated,
    /// New letter found in the word
    Hit,
    /// New letter not in the word; one attempt spent
    Miss,
    /// Game had already ended; nothing changed
    GameOver,
}

impl Guess {
    pub fn changed_state(self) -> bool {
        matches!(self, Guess::Hit | Guess::Miss)
    }
}

/// Uppercase a guessed character. `None` unless it is alphabetic and
/// uppercases to exactly one character.
pub fn normalize_letter(letter: char) -> Option<char> {
    if !letter.is_alphabetic() {
        return None;
    }

    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// True when `word` is non-empty and every character can be guessed.
///
/// Only such words can be completed, since guesses must pass [`normalize_letter`].
pub fn is_playable_word(word: &str) -> bool {
    let word = word.to_uppercase();
    !word.is_empty() && word.chars().all(|c| normalize_letter(c) == Some(c))
}

/// A single hangman round over one word
#[derive(Debug, Clone)]
pub struct HangmanGame {
    word: String,
    attempted: LetterSet,
    remaining_attempts: i32,
}

impl HangmanGame {
    pub fn new(word: &str) -> Self {
        Self::resume(word, LetterSet::new(), MAX_ATTEMPTS)
    }

    /// Rebuild a game from persisted parts. Attempts are clamped to `0..=MAX_ATTEMPTS`.
    pub fn resume(word: &str, attempted: LetterSet, remaining_attempts: i32) -> Self {
        Self {
            word: word.to_uppercase(),
            attempted,
            remaining_attempts: remaining_attempts.clamp(0, MAX_ATTEMPTS),
        }
    }

    /// Apply a guess.
    ///
    /// Attempts only drop for a new letter that is not in the word, and never below zero.
    pub fn guess(&mut self, letter: char) -> Result<Guess, GameError> {
        let letter = normalize_letter(letter).ok_or(GameError::InvalidLetter(letter))?;

        if self.state() != GameState::InProgress {
            return Ok(Guess::GameOver);
        }

        if !self.attempted.insert(letter) {
            return Ok(Guess::Repeated);
        }

        if self.word.contains(letter) {
            Ok(Guess::Hit)
        } else {
            self.remaining_attempts = (self.remaining_attempts - 1).max(0);
            Ok(Guess::Miss)
        }
    }

    pub fn hidden_word(&self) -> String {
        renderer::hidden_word(&self.word, &self.attempted)
    }

    pub fn is_complete(&self) -> bool {
        renderer::is_revealed(&self.word, &self.attempted)
    }

    /// Completion wins over running out of attempts
    pub fn state(&self) -> GameState {
        if self.is_complete() {
            GameState::Won
        } else if self.remaining_attempts == 0 {
            GameState::Lost
        } else {
            GameState::InProgress
        }
    }

    pub fn score(&self) -> i32 {
        Scorer::calculate_score(
            &self.word,
            &self.attempted,
            self.is_complete(),
            self.remaining_attempts,
        )
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn attempted(&self) -> &LetterSet {
        &self.attempted
    }

    pub fn remaining_attempts(&self) -> i32 {
        self.remaining_attempts
    }
}
