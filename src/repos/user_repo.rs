/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - DB エラーは RepoError に変換して返す
 *
 * Schema (assumed):
 * - users.id (bigserial), users.username (text, unique), users.name, users.email,
 *   users.bio (text, default ''), users.password_hash (text), users.created_at (timestamptz)
 * - posts/comments/follows/likes reference users.id with ON DELETE CASCADE
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub posts: i64,
    pub followers: i64,
    pub following: i64,
}

/// Input for `create`. The password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub bio: &'a str,
    pub password_hash: &'a str,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct UserChanges<'a> {
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub password_hash: Option<&'a str>,
}

pub async fn create(db: &PgPool, user: NewUser<'_>) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, name, email, bio, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, username, name, email, bio, password_hash, created_at
        "#,
    )
    .bind(user.username)
    .bind(user.name)
    .bind(user.email)
    .bind(user.bio)
    .bind(user.password_hash)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get_by_id(db: &PgPool, user_id: i64) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, name, email, bio, password_hash, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_name(db: &PgPool, username: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, name, email, bio, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn profile(db: &PgPool, username: &str) -> RepoResult<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT
            u.id, u.username, u.name, u.bio,
            (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS posts,
            (SELECT COUNT(*) FROM follows f WHERE f.followee_id = u.id) AS followers,
            (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following
        FROM users u
        WHERE u.username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: i64,
    changes: UserChanges<'_>,
) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET
            username = COALESCE($2, username),
            name = COALESCE($3, name),
            email = COALESCE($4, email),
            bio = COALESCE($5, bio),
            password_hash = COALESCE($6, password_hash)
        WHERE id = $1
        RETURNING id, username, name, email, bio, password_hash, created_at
        "#,
    )
    .bind(user_id)
    .bind(changes.username)
    .bind(changes.name)
    .bind(changes.email)
    .bind(changes.bio)
    .bind(changes.password_hash)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
