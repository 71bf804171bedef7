use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A word from the shared pool. Once `used` is set it is never handed out again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Word {
    pub word_id: i64,
    pub text: String,
    pub used: bool,
}
