/*
 * Responsibility
 * - post_likes / comment_likes の追加・削除・一覧
 * - (user_id, resource) は UNIQUE。重複は Conflict、対象が無ければ MissingReference
 */
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

/// Which join table a like lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
}

impl LikeTarget {
    fn insert_sql(self) -> &'static str {
        match self {
            Self::Post => "INSERT INTO post_likes (user_id, post_id) VALUES ($1, $2)",
            Self::Comment => "INSERT INTO comment_likes (user_id, comment_id) VALUES ($1, $2)",
        }
    }

    fn delete_sql(self) -> &'static str {
        match self {
            Self::Post => "DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2",
            Self::Comment => "DELETE FROM comment_likes WHERE user_id = $1 AND comment_id = $2",
        }
    }

    fn likers_sql(self) -> &'static str {
        match self {
            Self::Post => {
                r#"
                SELECT u.username
                FROM post_likes l
                INNER JOIN users u ON u.id = l.user_id
                WHERE l.post_id = $1
                ORDER BY l.created_at DESC
                "#
            }
            Self::Comment => {
                r#"
                SELECT u.username
                FROM comment_likes l
                INNER JOIN users u ON u.id = l.user_id
                WHERE l.comment_id = $1
                ORDER BY l.created_at DESC
                "#
            }
        }
    }
}

pub async fn like(pool: &PgPool, target: LikeTarget, user_id: i64, id: i64) -> RepoResult<()> {
    sqlx::query(target.insert_sql())
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await
        .map_err(RepoError::from_sqlx)?;

    Ok(())
}

pub async fn unlike(pool: &PgPool, target: LikeTarget, user_id: i64, id: i64) -> RepoResult<bool> {
    let result = sqlx::query(target.delete_sql())
        .bind(user_id)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Usernames of everyone who liked the post/comment.
pub async fn likers(pool: &PgPool, target: LikeTarget, id: i64) -> RepoResult<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(target.likers_sql())
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(names)
}
