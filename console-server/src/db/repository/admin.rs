//! Admin Repository

use super::RepoResult;
use shared::models::AdminProfile;
use sqlx::SqliteExecutor;

const COLUMNS: &str = "id, name, email, password, image, email_verified, created, updated";

/// Admin account row, password hash included
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub email_verified: bool,
    pub created: i64,
    pub updated: i64,
}

impl Admin {
    pub fn profile(&self) -> AdminProfile {
        AdminProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
            email_verified: self.email_verified,
        }
    }
}

pub async fn find_by_id<'e>(ex: impl SqliteExecutor<'e>, id: i64) -> RepoResult<Option<Admin>> {
    let row = sqlx::query_as::<_, Admin>(&format!("SELECT {COLUMNS} FROM admins WHERE id = ?"))
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_by_email<'e>(
    ex: impl SqliteExecutor<'e>,
    email: &str,
) -> RepoResult<Option<Admin>> {
    let row = sqlx::query_as::<_, Admin>(&format!(
        "SELECT {COLUMNS} FROM admins WHERE email = ? LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn insert<'e>(ex: impl SqliteExecutor<'e>, admin: &Admin) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO admins (id, name, email, password, image, email_verified, created, updated) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(admin.id)
    .bind(&admin.name)
    .bind(&admin.email)
    .bind(&admin.password)
    .bind(&admin.image)
    .bind(admin.email_verified)
    .bind(admin.created)
    .bind(admin.updated)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn mark_email_verified<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE admins SET email_verified = 1, updated = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

pub async fn update_password<'e>(
    ex: impl SqliteExecutor<'e>,
    id: i64,
    password_hash: &str,
    now: i64,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE admins SET password = ?, updated = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}
