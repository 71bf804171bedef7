use sqlx::{PgConnection, Result};

use crate::models::{
    CompletedGame, GameInProgress, NewCompletedGame, NewGameInProgress, Player, Word,
};

// Player queries
pub async fn get_player(conn: &mut PgConnection, player_id: i64) -> Result<Option<Player>> {
    sqlx::query_as::<_, Player>("SELECT * FROM players WHERE player_id = $1")
        .bind(player_id)
        .fetch_optional(conn)
        .await
}

// Word queries

/// Pick a random unused word and lock it for the rest of the transaction.
/// Rows locked by a concurrent start are skipped so two games never share a word.
pub async fn get_random_unused_word(conn: &mut PgConnection) -> Result<Option<Word>> {
    sqlx::query_as::<_, Word>(
        r#"
        SELECT * FROM words
        WHERE used = FALSE
        ORDER BY random()
        LIMIT 1
        FOR UPDATE SKIP LOCKED
        "#,
    )
    .fetch_optional(conn)
    .await
}

pub async fn mark_word_used(conn: &mut PgConnection, word_id: i64) -> Result<()> {
    sqlx::query("UPDATE words SET used = TRUE WHERE word_id = $1 AND used = FALSE")
        .bind(word_id)
        .execute(conn)
        .await?;
    Ok(())
}

// Game in progress queries

/// Latest active game for a player, locked against concurrent guesses
pub async fn get_most_recent_game_in_progress(
    conn: &mut PgConnection,
    player_id: i64,
) -> Result<Option<GameInProgress>> {
    sqlx::query_as::<_, GameInProgress>(
        r#"
        SELECT g.game_id, g.player_id, g.word_id, w.text AS word,
               g.attempted_letters, g.remaining_attempts, g.started_at
        FROM games_in_progress g
        JOIN words w ON w.word_id = g.word_id
        WHERE g.player_id = $1
        ORDER BY g.started_at DESC, g.game_id DESC
        LIMIT 1
        FOR UPDATE OF g
        "#,
    )
    .bind(player_id)
    .fetch_optional(conn)
    .await
}

pub async fn count_games_in_progress(conn: &mut PgConnection, player_id: i64) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games_in_progress WHERE player_id = $1")
        .bind(player_id)
        .fetch_one(conn)
        .await
}

pub async fn create_game_in_progress(
    conn: &mut PgConnection,
    game: &NewGameInProgress,
) -> Result<GameInProgress> {
    sqlx::query_as::<_, GameInProgress>(
        r#"
        WITH inserted AS (
            INSERT INTO games_in_progress (player_id, word_id, remaining_attempts, started_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
        )
        SELECT i.game_id, i.player_id, i.word_id, w.text AS word,
               i.attempted_letters, i.remaining_attempts, i.started_at
        FROM inserted i
        JOIN words w ON w.word_id = i.word_id
        "#,
    )
    .bind(game.player_id)
    .bind(game.word_id)
    .bind(game.remaining_attempts)
    .bind(game.started_at)
    .fetch_one(conn)
    .await
}

pub async fn update_game_in_progress(conn: &mut PgConnection, game: &GameInProgress) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE games_in_progress
        SET attempted_letters = $1, remaining_attempts = $2
        WHERE game_id = $3
        "#,
    )
    .bind(&game.attempted_letters)
    .bind(game.remaining_attempts)
    .bind(game.game_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete_game_in_progress(conn: &mut PgConnection, game_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM games_in_progress WHERE game_id = $1")
        .bind(game_id)
        .execute(conn)
        .await?;
    Ok(())
}

// Completed game queries
pub async fn create_completed_game(
    conn: &mut PgConnection,
    game: &NewCompletedGame,
) -> Result<CompletedGame> {
    sqlx::query_as::<_, CompletedGame>(
        r#"
        WITH inserted AS (
            INSERT INTO completed_games (player_id, word_id, outcome, score, finished_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
        )
        SELECT i.game_id, i.player_id, i.word_id, w.text AS word,
               i.outcome, i.score, i.finished_at
        FROM inserted i
        JOIN words w ON w.word_id = i.word_id
        "#,
    )
    .bind(game.player_id)
    .bind(game.word_id)
    .bind(game.outcome)
    .bind(game.score)
    .bind(game.finished_at)
    .fetch_one(conn)
    .await
}

pub async fn get_completed_games_for_player(
    conn: &mut PgConnection,
    player_id: i64,
) -> Result<Vec<CompletedGame>> {
    sqlx::query_as::<_, CompletedGame>(
        r#"
        SELECT c.game_id, c.player_id, c.word_id, w.text AS word,
               c.outcome, c.score, c.finished_at
        FROM completed_games c
        JOIN words w ON w.word_id = c.word_id
        WHERE c.player_id = $1
        ORDER BY c.finished_at, c.game_id
        "#,
    )
    .bind(player_id)
    .fetch_all(conn)
    .await
}

pub async fn get_all_completed_games(conn: &mut PgConnection) -> Result<Vec<CompletedGame>> {
    sqlx::query_as::<_, CompletedGame>(
        r#"
        SELECT c.game_id, c.player_id, c.word_id, w.text AS word,
               c.outcome, c.score, c.finished_at
        FROM completed_games c
        JOIN words w ON w.word_id = c.word_id
        ORDER BY c.finished_at, c.game_id
        "#,
    )
    .fetch_all(conn)
    .await
}
