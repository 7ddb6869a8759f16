//! Store contract the authorization layer depends on.
//!
//! Only four reads are needed to decide access, so the policy talks to this trait instead of
//! the repos directly. Each method returns `Ok(None)` for "not found" and `Err(_)` only when
//! the store itself failed; the caller must keep those two apart.
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::{
    comment_repo::{self, CommentRow},
    error::RepoResult,
    post_repo::{self, PostRow},
    user_repo::{self, UserRow},
};

#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn user_by_name(&self, username: &str) -> RepoResult<Option<UserRow>>;

    async fn user_by_id(&self, user_id: i64) -> RepoResult<Option<UserRow>>;

    async fn post(&self, post_id: i64) -> RepoResult<Option<PostRow>>;

    async fn comment(&self, comment_id: i64) -> RepoResult<Option<CommentRow>>;
}

/// Postgres-backed lookup (delegates to the repos).
#[derive(Clone, Debug)]
pub struct PgAccountLookup {
    pool: PgPool,
}

impl PgAccountLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountLookup for PgAccountLookup {
    async fn user_by_name(&self, username: &str) -> RepoResult<Option<UserRow>> {
        user_repo::get_by_name(&self.pool, username).await
    }

    async fn user_by_id(&self, user_id: i64) -> RepoResult<Option<UserRow>> {
        user_repo::get_by_id(&self.pool, user_id).await
    }

    async fn post(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        post_repo::get(&self.pool, post_id).await
    }

    async fn comment(&self, comment_id: i64) -> RepoResult<Option<CommentRow>> {
        comment_repo::get(&self.pool, comment_id).await
    }
}
