//! Shipping Rate Repository

use super::RepoResult;
use shared::models::ShippingRate;
use sqlx::SqliteExecutor;

const COLUMNS: &str =
    "id, name, minimum_delivery_days, maximum_delivery_days, rate, created, updated";

pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<ShippingRate>> {
    let rows = sqlx::query_as::<_, ShippingRate>(&format!(
        "SELECT {COLUMNS} FROM shipping_rates ORDER BY created"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<ShippingRate>> {
    let row = sqlx::query_as::<_, ShippingRate>(&format!(
        "SELECT {COLUMNS} FROM shipping_rates WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_name<'e>(
    ex: impl SqliteExecutor<'e>,
    name: &str,
) -> RepoResult<Option<ShippingRate>> {
    let row = sqlx::query_as::<_, ShippingRate>(&format!(
        "SELECT {COLUMNS} FROM shipping_rates WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, rate: &ShippingRate) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO shipping_rates (id, name, minimum_delivery_days, maximum_delivery_days, rate, created, updated) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(rate.id)
    .bind(&rate.name)
    .bind(rate.minimum_delivery_days)
    .bind(rate.maximum_delivery_days)
    .bind(rate.rate)
    .bind(rate.created)
    .bind(rate.updated)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn update<'e>(ex: impl SqliteExecutor<'e>, rate: &ShippingRate) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE shipping_rates SET name = ?, minimum_delivery_days = ?, maximum_delivery_days = ?, rate = ?, updated = ? WHERE id = ?",
    )
    .bind(&rate.name)
    .bind(rate.minimum_delivery_days)
    .bind(rate.maximum_delivery_days)
    .bind(rate.rate)
    .bind(rate.updated)
    .bind(rate.id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}
