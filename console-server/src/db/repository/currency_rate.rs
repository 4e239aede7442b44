//! Currency Rate Repository

use super::RepoResult;
use shared::models::CurrencyRate;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, from_currency, to_currency, rate, created, updated";

pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<CurrencyRate>> {
    let rows = sqlx::query_as::<_, CurrencyRate>(&format!(
        "SELECT {COLUMNS} FROM currency_rates ORDER BY created"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<CurrencyRate>> {
    let row = sqlx::query_as::<_, CurrencyRate>(&format!(
        "SELECT {COLUMNS} FROM currency_rates WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Lookup by the `(from, to)` dedup pair
pub async fn find_by_pair<'e>(
    ex: impl SqliteExecutor<'e>,
    from: &str,
    to: &str,
) -> RepoResult<Option<CurrencyRate>> {
    let row = sqlx::query_as::<_, CurrencyRate>(&format!(
        "SELECT {COLUMNS} FROM currency_rates WHERE from_currency = ? AND to_currency = ? LIMIT 1"
    ))
    .bind(from)
    .bind(to)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, rate: &CurrencyRate) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO currency_rates (id, from_currency, to_currency, rate, created, updated) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(rate.id)
    .bind(&rate.from)
    .bind(&rate.to)
    .bind(rate.rate)
    .bind(rate.created)
    .bind(rate.updated)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update_rate<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    rate: f64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE currency_rates SET rate = ?, updated = ? WHERE id = ?")
        .bind(rate)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
