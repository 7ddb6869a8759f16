/*
 * Responsibility
 * - comments CRUD
 * - post_id / user_id どちらの削除でも CASCADE で消える前提
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

pub async fn list_by_post(
    pool: &PgPool,
    post_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<CommentRow>> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, post_id, user_id, text, created_at
        FROM comments
        WHERE post_id = $1
        ORDER BY id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fails with `RepoError::MissingReference` when the post is gone.
pub async fn create(
    pool: &PgPool,
    post_id: i64,
    user_id: i64,
    text: &str,
) -> RepoResult<CommentRow> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        INSERT INTO comments (post_id, user_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, post_id, user_id, text, created_at
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .bind(text)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get(pool: &PgPool, comment_id: i64) -> RepoResult<Option<CommentRow>> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT id, post_id, user_id, text, created_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update(pool: &PgPool, comment_id: i64, text: &str) -> RepoResult<Option<CommentRow>> {
    let row = sqlx::query_as::<_, CommentRow>(
        r#"
        UPDATE comments
        SET text = $2
        WHERE id = $1
        RETURNING id, post_id, user_id, text, created_at
        "#,
    )
    .bind(comment_id)
    .bind(text)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, comment_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
