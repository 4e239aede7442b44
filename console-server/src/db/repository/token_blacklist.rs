//! Consumed link tokens

use super::RepoResult;
use sqlx::SqliteExecutor;

pub async fn contains<'e>(ex: impl SqliteExecutor<'e>, jti: &str) -> RepoResult<bool> {
    let row: Option<(String,)> = sqlx::query_as("SELECT jti FROM token_blacklist WHERE jti = ?")
        .bind(jti)
        .fetch_optional(ex)
        .await?;
    Ok(row.is_some())
}

/// Returns false when the token was already listed
pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, jti: &str, now: i64) -> RepoResult<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO token_blacklist (jti, created) VALUES (?, ?)")
        .bind(jti)
        .bind(now)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}
