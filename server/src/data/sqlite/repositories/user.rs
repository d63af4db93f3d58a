//! User repository for SQLite operations
//!
//! Identity is resolved upstream; this module only mirrors the identity
//! provider's `(user id, active flag)` view for ownership and membership
//! checks.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::UserRow;

/// Fetch a user by id
pub async fn get_user(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, display_name, is_active, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert a user row (used by tests and by identity-sync tooling)
pub async fn insert_user(
    pool: &SqlitePool,
    display_name: Option<&str>,
) -> Result<UserRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let id = sqlx::query("INSERT INTO users (display_name, created_at, updated_at) VALUES (?, ?, ?)")
        .bind(display_name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?
        .last_insert_rowid();

    Ok(UserRow {
        id,
        email: None,
        display_name: display_name.map(str::to_string),
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::test_pool;

    #[tokio::test]
    async fn test_get_user_bootstrap_row() {
        let pool = test_pool().await;

        let user = get_user(&pool, 1).await.unwrap().unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Local User"));
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_get_user_missing() {
        let pool = test_pool().await;
        assert!(get_user(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_user() {
        let pool = test_pool().await;

        let user = insert_user(&pool, Some("Omamah")).await.unwrap();
        assert!(user.id > 1);

        let fetched = get_user(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(fetched.display_name.as_deref(), Some("Omamah"));
    }
}
