/*
 * Responsibility
 * - posts CRUD
 * - user_id の FK (CASCADE) 前提で削除挙動を意識
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

pub async fn list_by_user(
    pool: &PgPool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> RepoResult<Vec<PostRow>> {
    let rows = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, user_id, content, media_url, created_at, edited_at
        FROM posts
        WHERE user_id = $1
        ORDER BY id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create(
    pool: &PgPool,
    user_id: i64,
    content: &str,
    media_url: Option<&str>,
) -> RepoResult<PostRow> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        INSERT INTO posts (user_id, content, media_url)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, content, media_url, created_at, edited_at
        "#,
    )
    .bind(user_id)
    .bind(content)
    .bind(media_url)
    .fetch_one(pool)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get(pool: &PgPool, post_id: i64) -> RepoResult<Option<PostRow>> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, user_id, content, media_url, created_at, edited_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    post_id: i64,
    content: Option<&str>,
    media_url: Option<Option<&str>>,
) -> RepoResult<Option<PostRow>> {
    // media_url: Some(Some(v)) -> set to v
    // media_url: Some(None)    -> set to NULL
    // media_url: None          -> do not update
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        UPDATE posts
        SET
            content = COALESCE($2, content),
            media_url = CASE
                WHEN $3 = false THEN media_url
                ELSE $4
            END,
            edited_at = now()
        WHERE id = $1
        RETURNING id, user_id, content, media_url, created_at, edited_at
        "#,
    )
    .bind(post_id)
    .bind(content)
    .bind(media_url.is_some()) // $3: flag to set media_url
    .bind(media_url.flatten()) // $4: new media_url value
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, post_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
