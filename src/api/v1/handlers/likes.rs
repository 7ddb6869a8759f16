/*
 * Responsibility
 * - post / comment への like・unlike・一覧
 * - post と comment で同じ処理を LikeTarget で切り替える
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{extractors::AuthCtxExtractor, handlers::repo_err},
    error::AppError,
    repos::{
        comment_repo,
        like_repo::{self, LikeTarget},
        post_repo,
    },
    state::AppState,
};

fn noun(target: LikeTarget) -> &'static str {
    match target {
        LikeTarget::Post => "post",
        LikeTarget::Comment => "comment",
    }
}

async fn ensure_exists(state: &AppState, target: LikeTarget, id: i64) -> Result<(), AppError> {
    let found = match target {
        LikeTarget::Post => post_repo::get(&state.db, id).await?.is_some(),
        LikeTarget::Comment => comment_repo::get(&state.db, id).await?.is_some(),
    };
    if !found {
        return Err(AppError::NotFound(noun(target)));
    }
    Ok(())
}

async fn like(
    state: AppState,
    caller: i64,
    target: LikeTarget,
    id: i64,
) -> Result<StatusCode, AppError> {
    like_repo::like(&state.db, target, caller, id)
        .await
        .map_err(repo_err("already liked", noun(target)))?;
    Ok(StatusCode::CREATED)
}

async fn unlike(
    state: AppState,
    caller: i64,
    target: LikeTarget,
    id: i64,
) -> Result<StatusCode, AppError> {
    if !like_repo::unlike(&state.db, target, caller, id).await? {
        return Err(AppError::NotFound("like"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn likers(state: AppState, target: LikeTarget, id: i64) -> Result<Json<Vec<String>>, AppError> {
    ensure_exists(&state, target, id).await?;
    Ok(Json(like_repo::likers(&state.db, target, id).await?))
}

pub async fn like_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    like(state, ctx.user_id, LikeTarget::Post, post_id).await
}

pub async fn unlike_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    unlike(state, ctx.user_id, LikeTarget::Post, post_id).await
}

pub async fn post_likers(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<String>>, AppError> {
    likers(state, LikeTarget::Post, post_id).await
}

pub async fn like_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    like(state, ctx.user_id, LikeTarget::Comment, comment_id).await
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    unlike(state, ctx.user_id, LikeTarget::Comment, comment_id).await
}

pub async fn comment_likers(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<Vec<String>>, AppError> {
    likers(state, LikeTarget::Comment, comment_id).await
}
