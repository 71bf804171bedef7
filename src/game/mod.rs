// Game engine modules

pub mod letters;
pub mod machine;
pub mod renderer;
pub mod scorer;

pub use letters::LetterSet;
pub use machine::{is_playable_word, normalize_letter, GameState, Guess, HangmanGame, MAX_ATTEMPTS};
pub use scorer::Scorer;
