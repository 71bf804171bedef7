use std::collections::BTreeSet;
use std::fmt;

const DELIMITER: char = ',';

/// Set of letters a player has attempted, stored as uppercase characters.
///
/// Persisted as a comma-joined string (`"A,G,T"`). Order carries no meaning;
/// the `BTreeSet` only keeps the encoding stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterSet {
    letters: BTreeSet<char>,
}

impl LetterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the persisted form. Blank tokens are skipped and only the first
    /// character of each token is kept.
    pub fn decode(encoded: &str) -> Self {
        let letters = encoded
            .split(DELIMITER)
            .map(str::trim)
            .filter_map(|token| token.chars().next())
            .collect();

        Self { letters }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Returns false if the letter was already present
    pub fn insert(&mut self, letter: char) -> bool {
        self.letters.insert(letter)
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.letters.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, letter) in self.letters.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", DELIMITER)?;
            }
            write!(f, "{}", letter)?;
        }
        Ok(())
    }
}

impl FromIterator<char> for LetterSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self {
            letters: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    const ALPHABET: &str = "ABCDEFGHIJKLMNÑOPQRSTUVWXYZ";

    #[test]
    fn test_empty_set_encodes_to_empty_string() {
        assert_eq!(LetterSet::new().encode(), "");
        assert!(LetterSet::decode("").is_empty());
    }

    #[test]
    fn test_decode_skips_blank_tokens() {
        let set = LetterSet::decode(" A, ,,G ,  ");
        assert_eq!(set.len(), 2);
        assert!(set.contains('A'));
        assert!(set.contains('G'));
    }

    #[test]
    fn test_round_trip_ignores_insertion_order() {
        let forward: LetterSet = ['Z', 'A', 'M'].into_iter().collect();
        let backward: LetterSet = ['M', 'A', 'Z'].into_iter().collect();

        assert_eq!(forward.encode(), "A,M,Z");
        assert_eq!(forward.encode(), backward.encode());
        assert_eq!(LetterSet::decode(&forward.encode()), forward);
    }

    #[test]
    fn test_decode_accepts_unordered_input() {
        let set = LetterSet::decode("T,G,A");
        assert_eq!(set, ['A', 'G', 'T'].into_iter().collect());
    }

    #[test]
    fn test_insert_reports_duplicates() {
        let mut set = LetterSet::new();
        assert!(set.insert('Q'));
        assert!(!set.insert('Q'));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_random_sets_survive_encoding() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let mut letters: Vec<char> = ALPHABET
                .chars()
                .filter(|_| rng.random_bool(0.3))
                .collect();
            let set: LetterSet = letters.iter().copied().collect();
            let encoded = set.encode();

            assert_eq!(LetterSet::decode(&encoded), set);
            assert_eq!(encoded.split(',').filter(|t| !t.is_empty()).count(), set.len());

            letters.shuffle(&mut rng);
            let shuffled: LetterSet = letters.into_iter().collect();
            assert_eq!(shuffled.encode(), encoded);
        }
    }
}
