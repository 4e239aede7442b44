//! Promo Code Repository

use super::RepoResult;
use shared::models::PromoCode;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, code, valid_until, discount_percent, created, updated";

pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<PromoCode>> {
    let rows = sqlx::query_as::<_, PromoCode>(&format!(
        "SELECT {COLUMNS} FROM promocodes ORDER BY created"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<PromoCode>> {
    let row = sqlx::query_as::<_, PromoCode>(&format!(
        "SELECT {COLUMNS} FROM promocodes WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_code<'e>(
    ex: impl SqliteExecutor<'e>,
    code: &str,
) -> RepoResult<Option<PromoCode>> {
    let row = sqlx::query_as::<_, PromoCode>(&format!(
        "SELECT {COLUMNS} FROM promocodes WHERE code = ? LIMIT 1"
    ))
    .bind(code)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, promo: &PromoCode) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO promocodes (id, code, valid_until, discount_percent, created, updated) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(promo.id)
    .bind(&promo.code)
    .bind(&promo.valid_until)
    .bind(promo.discount_percent)
    .bind(promo.created)
    .bind(promo.updated)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    valid_until: &str,
    discount_percent: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE promocodes SET valid_until = ?, discount_percent = ?, updated = ? WHERE id = ?",
    )
    .bind(valid_until)
    .bind(discount_percent)
    .bind(now)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM promocodes WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() > 0)
}
