pub mod game;
pub mod player;
pub mod word;

pub use game::{CompletedGame, GameInProgress, NewCompletedGame, NewGameInProgress, Outcome};
pub use player::Player;
pub use word::Word;
