//! Category Repository
//!
//! Embedded documents (parent snapshot, properties, child names, images) are
//! JSON columns. Child-name lists are edited in place with SQLite JSON
//! functions so each push/pull is a single statement.

use super::RepoResult;
use shared::models::{Category, ImageRef, ParentCategory, Property};
use sqlx::SqliteExecutor;
use sqlx::types::Json;

const COLUMNS: &str =
    "id, name, parent_id, parent_category, properties, child_categories, images, created, updated";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    #[allow(dead_code)]
    parent_id: Option<i64>,
    parent_category: Json<ParentCategory>,
    properties: Json<Vec<Property>>,
    child_categories: Json<Vec<String>>,
    images: Json<Vec<ImageRef>>,
    created: i64,
    updated: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            parent_category: row.parent_category.0,
            properties: row.properties.0,
            child_categories: row.child_categories.0,
            images: row.images.0,
            created: row.created,
            updated: row.updated,
        }
    }
}

pub async fn find_all<'e>(ex: impl SqliteExecutor<'e>) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {COLUMNS} FROM categories ORDER BY created"
    ))
    .fetch_all(ex)
    .await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

/// Every category except `id` (the parent picker list)
pub async fn find_all_except<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE id != ? ORDER BY created"
    ))
    .bind(id)
    .fetch_all(ex)
    .await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(Category::from))
}

pub async fn find_by_name<'e>(
    ex: impl SqliteExecutor<'e>,
    name: &str,
) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, CategoryRow>(&format!(
        "SELECT {COLUMNS} FROM categories WHERE name = ? LIMIT 1"
    ))
    .bind(name)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(Category::from))
}

/// Canonical parent id of a category; `None` if the category is missing
pub async fn find_parent_id<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
) -> RepoResult<Option<Option<i64>>> {
    let parent: Option<(Option<i64>,)> =
        sqlx::query_as("SELECT parent_id FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(ex)
            .await?;
    Ok(parent.map(|(p,)| p))
}

pub async fn find_child_ids<'e>(ex: impl SqliteExecutor<'e>, parent_id: i64) -> RepoResult<Vec<i64>> {
    let rows: Vec<(i64,)> =
        sqlx::query_as("SELECT id FROM categories WHERE parent_id = ? ORDER BY created")
            .bind(parent_id)
            .fetch_all(ex)
            .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

pub async fn insert<'e>(
    ex: impl SqliteExecutor<'e>,
    category: &Category,
    parent_id: Option<i64>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO categories (id, name, parent_id, parent_category, properties, child_categories, images, created, updated) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(category.id)
    .bind(&category.name)
    .bind(parent_id)
    .bind(Json(&category.parent_category))
    .bind(Json(&category.properties))
    .bind(Json(&category.child_categories))
    .bind(Json(&category.images))
    .bind(category.created)
    .bind(category.updated)
    .execute(ex)
    .await?;
    Ok(())
}

/// Field update of an edited category; returns the number of rows touched
pub async fn update<'e>(
    ex: impl SqliteExecutor<'e>,
    category: &Category,
    parent_id: Option<i64>,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE categories SET name = ?, parent_id = ?, parent_category = ?, properties = ?, images = ?, updated = ? WHERE id = ?",
    )
    .bind(&category.name)
    .bind(parent_id)
    .bind(Json(&category.parent_category))
    .bind(Json(&category.properties))
    .bind(Json(&category.images))
    .bind(category.updated)
    .bind(category.id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_parent_snapshot<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    snapshot: &ParentCategory,
) -> RepoResult<()> {
    sqlx::query("UPDATE categories SET parent_category = ? WHERE id = ?")
        .bind(Json(snapshot))
        .bind(id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Append a child name unless it is already listed
pub async fn push_child<'e>(
    ex: impl SqliteExecutor<'e>,
    parent_id: i64,
    child_name: &str,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE categories SET child_categories = json_insert(child_categories, '$[#]', ?1) \
         WHERE id = ?2 AND NOT EXISTS (SELECT 1 FROM json_each(categories.child_categories) WHERE value = ?1)",
    )
    .bind(child_name)
    .bind(parent_id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Remove every occurrence of a child name
pub async fn pull_child<'e>(
    ex: impl SqliteExecutor<'e>,
    parent_id: i64,
    child_name: &str,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE categories SET child_categories = \
         (SELECT COALESCE(json_group_array(value), '[]') FROM json_each(categories.child_categories) WHERE value != ?1) \
         WHERE id = ?2",
    )
    .bind(child_name)
    .bind(parent_id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Drop one image reference by key
pub async fn pull_image<'e>(ex: impl SqliteExecutor<'e>, id: i64, key: &str) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE categories SET images = \
         (SELECT COALESCE(json_group_array(json(value)), '[]') FROM json_each(categories.images) WHERE json_extract(value, '$.key') != ?1) \
         WHERE id = ?2",
    )
    .bind(key)
    .bind(id)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}
