use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db::models::UserRecord;

/// Insert the user if absent; on conflict refresh only the display name.
/// `blocked` is never written here and `last_active` is only seeded on the
/// initial insert (callers refresh it via `touch`).
pub async fn upsert(
    pool: &SqlitePool,
    user_id: i64,
    username: Option<&str>,
    first_seen: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, blocked, last_active)
        VALUES (?, ?, 0, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            username = COALESCE(excluded.username, users.username)
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(first_seen)
    .execute(pool)
    .await?;

    Ok(())
}

/// Last write wins; a no-op for unknown ids
pub async fn touch(pool: &SqlitePool, user_id: i64, at: DateTime<Utc>) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_active = ? WHERE user_id = ?")
        .bind(at)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get(pool: &SqlitePool, user_id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Unknown users are not blocked
pub async fn is_blocked(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
    let row: Option<(bool,)> = sqlx::query_as("SELECT blocked FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.0).unwrap_or(false))
}

/// Returns whether a row was actually updated
pub async fn set_blocked(
    pool: &SqlitePool,
    user_id: i64,
    blocked: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET blocked = ? WHERE user_id = ?")
        .bind(blocked)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_total(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

pub async fn count_blocked(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE blocked = 1")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

pub async fn count_active(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE blocked = 0")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Online is a refinement of active: blocked rows are excluded even when
/// their `last_active` is recent, keeping `online <= active` after an admin
/// blocks a freshly seen user
pub async fn count_online(
    pool: &SqlitePool,
    cutoff: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM users WHERE blocked = 0 AND last_active >= ?")
            .bind(cutoff)
            .fetch_one(pool)
            .await?;

    Ok(row.0)
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY user_id")
        .fetch_all(pool)
        .await
}
