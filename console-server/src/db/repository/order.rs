//! Order Repository (read-only)

use super::RepoResult;
use shared::models::Order;
use sqlx::SqliteExecutor;
use sqlx::types::Json;

const COLUMNS: &str = "id, order_id, user_email, products, sub_total, total, shipping_rate, shipping_fee, payment_id, payment_method, payment_status, delivery_status, discount, promocode, currency, created, updated";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_id: String,
    user_email: String,
    products: Json<Vec<serde_json::Value>>,
    sub_total: f64,
    total: f64,
    shipping_rate: String,
    shipping_fee: f64,
    payment_id: String,
    payment_method: String,
    payment_status: String,
    delivery_status: String,
    discount: f64,
    promocode: Option<String>,
    currency: String,
    created: i64,
    updated: i64,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            order_id: row.order_id,
            user_email: row.user_email,
            products: row.products.0,
            sub_total: row.sub_total,
            total: row.total,
            shipping_rate: row.shipping_rate,
            shipping_fee: row.shipping_fee,
            payment_id: row.payment_id,
            payment_method: row.payment_method,
            payment_status: row.payment_status,
            delivery_status: row.delivery_status,
            discount: row.discount,
            promocode: row.promocode,
            currency: row.currency,
            created: row.created,
            updated: row.updated,
        }
    }
}

/// Newest first
pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders ORDER BY created DESC"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows.into_iter().map(Order::from).collect())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(Order::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_defaults_and_ordering() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO orders (id, order_id, user_email, products, sub_total, total, shipping_rate, shipping_fee, payment_id, payment_method, payment_status, currency, created, updated) \
             VALUES (1, 'ORD-1', 'a@shop.test', '[{\"name\":\"Pixel\",\"quantity\":1}]', 100, 105, 'Standard', 5, 'pay_1', 'card', 'PAID', 'USD', 1, 1), \
                    (2, 'ORD-2', 'b@shop.test', '[]', 50, 50, 'Standard', 0, 'pay_2', 'card', 'PAID', 'USD', 2, 2)",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let orders = find_all(&db.pool).await.unwrap();
        assert_eq!(orders[0].order_id, "ORD-2");
        assert_eq!(orders[1].delivery_status, "PENDING");
        assert_eq!(orders[1].discount, 0.0);
        assert_eq!(orders[1].promocode, None);
        assert_eq!(orders[1].products.len(), 1);
    }
}
