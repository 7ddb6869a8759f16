/*
 * Responsibility
 * - v1 handler 群
 * - 認可は guard 側で済んでいる前提。handler は AuthCtx の user_id だけを信じる
 */
use crate::error::AppError;
use crate::repos::error::RepoError;

pub mod auth;
pub mod comments;
pub mod follows;
pub mod health;
pub mod likes;
pub mod posts;
pub mod users;

/// 制約違反を文脈つきのメッセージに変換する
pub(crate) fn repo_err(
    conflict: &'static str,
    missing: &'static str,
) -> impl Fn(RepoError) -> AppError {
    move |e| match e {
        RepoError::Conflict => AppError::Conflict(conflict),
        RepoError::MissingReference => AppError::NotFound(missing),
        other => AppError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_keep_their_context() {
        let map = repo_err("already liked", "post");

        assert!(matches!(
            map(RepoError::Conflict),
            AppError::Conflict("already liked")
        ));
        assert!(matches!(
            map(RepoError::MissingReference),
            AppError::NotFound("post")
        ));
        assert!(matches!(
            map(RepoError::Db(sqlx::Error::PoolTimedOut)),
            AppError::Internal
        ));
    }
}
