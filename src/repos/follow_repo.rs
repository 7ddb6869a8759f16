/*
 * Responsibility
 * - follows (follower -> followee) の追加・削除・一覧
 * - (follower_id, followee_id) は UNIQUE。重複は RepoError::Conflict
 */
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

pub async fn follow(pool: &PgPool, follower_id: i64, followee_id: i64) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followee_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(())
}

pub async fn unfollow(pool: &PgPool, follower_id: i64, followee_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND followee_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(followee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Usernames of everyone following `user_id`.
pub async fn followers(pool: &PgPool, user_id: i64) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.username
        FROM follows f
        INNER JOIN users u ON u.id = f.follower_id
        WHERE f.followee_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// Usernames `user_id` follows.
pub async fn following(pool: &PgPool, user_id: i64) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.username
        FROM follows f
        INNER JOIN users u ON u.id = f.followee_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(names)
}
