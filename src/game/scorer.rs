use super::LetterSet;

/// Awarded for revealing the whole word
pub const FULL_WORD_POINTS: i32 = 20;
/// Awarded per distinct correct letter when the game is lost
pub const POINTS_PER_LETTER: i32 = 1;

pub struct Scorer;

impl Scorer {
    /// Calculate the score for a game.
    ///
    /// Scoring rules:
    /// - Word revealed: flat bonus, whatever the attempts left
    /// - Attempts exhausted: one point per distinct attempted letter found in the word
    /// - Otherwise the game is still running and scores nothing
    pub fn calculate_score(
        word: &str,
        attempted: &LetterSet,
        complete: bool,
        remaining_attempts: i32,
    ) -> i32 {
        if complete {
            return FULL_WORD_POINTS;
        }

        if remaining_attempts == 0 {
            return Self::correct_letters(word, attempted) * POINTS_PER_LETTER;
        }

        0
    }

    /// Count attempted letters that appear in the word, each counted once
    fn correct_letters(word: &str, attempted: &LetterSet) -> i32 {
        attempted.iter().filter(|&letter| word.contains(letter)).count() as i32
    }
}
