use thiserror::Error;

/// Failures raised by a storage adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("'{0}' is not a playable word")]
    InvalidWord(String),
    #[error("word {0} does not exist")]
    MissingWord(i64),
}

/// Coarse classification a transport layer can map to its own status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Exhausted,
    InvalidInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("player {0} not found")]
    PlayerNotFound(i64),
    #[error("player {0} has no game in progress")]
    NoActiveGame(i64),
    #[error("no unused words left")]
    WordsExhausted,
    #[error("'{0}' is not a single letter")]
    InvalidLetter(char),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::PlayerNotFound(_) | GameError::NoActiveGame(_) => ErrorKind::NotFound,
            GameError::WordsExhausted => ErrorKind::Exhausted,
            GameError::InvalidLetter(_) => ErrorKind::InvalidInput,
            GameError::Store(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failures_share_not_found_kind() {
        assert_eq!(GameError::PlayerNotFound(1).kind(), ErrorKind::NotFound);
        assert_eq!(GameError::NoActiveGame(1).kind(), ErrorKind::NotFound);
        assert_eq!(GameError::WordsExhausted.kind(), ErrorKind::Exhausted);
        assert_eq!(GameError::InvalidLetter('3').kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_store_errors_are_internal() {
        let err: GameError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let err: GameError = StoreError::MissingWord(7).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
