//! Product Repository

use super::RepoResult;
use shared::models::{ImageRef, Product};
use sqlx::SqliteExecutor;
use sqlx::types::Json;
use std::collections::BTreeMap;

const COLUMNS: &str = "id, name, brand, description, contents, price, currency, category, properties, discount, stock, images, created, updated";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    brand: String,
    description: String,
    contents: String,
    price: f64,
    currency: String,
    category: String,
    properties: Json<BTreeMap<String, String>>,
    discount: f64,
    stock: i64,
    images: Json<Vec<ImageRef>>,
    created: i64,
    updated: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            brand: row.brand,
            description: row.description,
            contents: row.contents,
            price: row.price,
            currency: row.currency,
            category: row.category,
            properties: row.properties.0,
            discount: row.discount,
            stock: row.stock,
            images: row.images.0,
            created: row.created,
            updated: row.updated,
        }
    }
}

pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM products ORDER BY created"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(Product::from))
}

pub async fn find_by_name<'e>(
    ex: impl SqliteExecutor<'e>,
    name: &str,
) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLUMNS} FROM products WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(Product::from))
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, product: &Product) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO products (id, name, brand, description, contents, price, currency, category, properties, discount, stock, images, created, updated) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.brand)
    .bind(&product.description)
    .bind(&product.contents)
    .bind(product.price)
    .bind(&product.currency)
    .bind(&product.category)
    .bind(Json(&product.properties))
    .bind(product.discount)
    .bind(product.stock)
    .bind(Json(&product.images))
    .bind(product.created)
    .bind(product.updated)
    .execute(ex)
    .await?;
    Ok(())
}

/// Replace every editable field; returns the number of rows touched
pub async fn update<'e>(ex: impl SqliteExecutor<'e>, product: &Product) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE products SET name = ?, brand = ?, description = ?, contents = ?, price = ?, currency = ?, category = ?, properties = ?, discount = ?, stock = ?, images = ?, updated = ? WHERE id = ?",
    )
    .bind(&product.name)
    .bind(&product.brand)
    .bind(&product.description)
    .bind(&product.contents)
    .bind(product.price)
    .bind(&product.currency)
    .bind(&product.category)
    .bind(Json(&product.properties))
    .bind(product.discount)
    .bind(product.stock)
    .bind(Json(&product.images))
    .bind(product.updated)
    .bind(product.id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Follow a category rename on every product that references it
pub async fn rename_category<'e>(
    ex: impl SqliteExecutor<'e>,
    old_name: &str,
    new_name: &str,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE products SET category = ?, updated = ? WHERE category = ?")
        .bind(new_name)
        .bind(now)
        .bind(old_name)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Drop one image reference by key
pub async fn pull_image<'e>(ex: impl SqliteExecutor<'e>, id: i64, key: &str) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE products SET images = \
         (SELECT COALESCE(json_group_array(json(value)), '[]') FROM json_each(products.images) WHERE json_extract(value, '$.key') != ?1) \
         WHERE id = ?2",
    )
    .bind(key)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn product(id: i64, name: &str, category: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            brand: "Acme".into(),
            description: "A phone".into(),
            contents: "Phone, cable".into(),
            price: 199.0,
            currency: "USD".into(),
            category: category.to_string(),
            properties: BTreeMap::from([("RAM".to_string(), "8GB".to_string())]),
            discount: 0.0,
            stock: 5,
            images: vec![
                ImageRef::new("a.png", "memory://images/a.png"),
                ImageRef::new("b.png", "memory://images/b.png"),
            ],
            created: id,
            updated: id,
        }
    }

    #[tokio::test]
    async fn test_insert_find_and_update() {
        let db = DbService::in_memory().await.unwrap();
        let mut p = product(1, "Pixel", "Phones");
        insert(&db.pool, &p).await.unwrap();

        p.stock = 0;
        p.properties.insert("Color".into(), "Black".into());
        assert_eq!(update(&db.pool, &p).await.unwrap(), 1);

        let found = find_by_name(&db.pool, "Pixel").await.unwrap().unwrap();
        assert_eq!(found.stock, 0);
        assert_eq!(found.properties.len(), 2);
    }

    #[tokio::test]
    async fn test_rename_category_touches_only_matching_products() {
        let db = DbService::in_memory().await.unwrap();
        insert(&db.pool, &product(1, "Pixel", "Phones")).await.unwrap();
        insert(&db.pool, &product(2, "ThinkPad", "Laptops")).await.unwrap();

        let changed = rename_category(&db.pool, "Phones", "Smartphones", 10)
            .await
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(
            find_by_id(&db.pool, 1).await.unwrap().unwrap().category,
            "Smartphones"
        );
        assert_eq!(
            find_by_id(&db.pool, 2).await.unwrap().unwrap().category,
            "Laptops"
        );
    }

    #[tokio::test]
    async fn test_pull_image() {
        let db = DbService::in_memory().await.unwrap();
        insert(&db.pool, &product(1, "Pixel", "Phones")).await.unwrap();

        pull_image(&db.pool, 1, "a.png").await.unwrap();
        let found = find_by_id(&db.pool, 1).await.unwrap().unwrap();
        assert_eq!(found.images.len(), 1);
        assert_eq!(found.images[0].key, "b.png");
    }
}
