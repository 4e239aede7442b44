//! Currency Repository

use super::RepoResult;
use shared::models::Currency;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, name, short_name, symbol, created, updated";

pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<Currency>> {
    let rows = sqlx::query_as::<_, Currency>(&format!(
        "SELECT {COLUMNS} FROM currencies ORDER BY created"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Currency>> {
    let row = sqlx::query_as::<_, Currency>(&format!(
        "SELECT {COLUMNS} FROM currencies WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_name<'e>(
    ex: impl SqliteExecutor<'e>,
    name: &str,
) -> RepoResult<Option<Currency>> {
    let row = sqlx::query_as::<_, Currency>(&format!(
        "SELECT {COLUMNS} FROM currencies WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, currency: &Currency) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO currencies (id, name, short_name, symbol, created, updated) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(currency.id)
    .bind(&currency.name)
    .bind(&currency.short_name)
    .bind(&currency.symbol)
    .bind(currency.created)
    .bind(currency.updated)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update<'e>(ex: impl SqliteExecutor<'e>, currency: &Currency) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE currencies SET name = ?, short_name = ?, symbol = ?, updated = ? WHERE id = ?",
    )
    .bind(&currency.name)
    .bind(&currency.short_name)
    .bind(&currency.symbol)
    .bind(currency.updated)
    .bind(currency.id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}
