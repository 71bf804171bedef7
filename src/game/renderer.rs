use super::LetterSet;

pub const PLACEHOLDER: char = '_';

/// Mask every character of `word` that has not been attempted.
///
/// `word` is expected uppercase. The result has the same number of characters.
pub fn hidden_word(word: &str, attempted: &LetterSet) -> String {
    word.chars()
        .map(|c| if attempted.contains(c) { c } else { PLACEHOLDER })
        .collect()
}

/// True once every character of `word` has been attempted
pub fn is_revealed(word: &str, attempted: &LetterSet) -> bool {
    word.chars().all(|c| attempted.contains(c))
}
