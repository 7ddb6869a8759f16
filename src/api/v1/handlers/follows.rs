/*
 * Responsibility
 * - follow / unfollow (caller → path の user)
 * - followers / following の一覧 (username のみ)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{extractors::AuthCtxExtractor, handlers::repo_err},
    error::AppError,
    repos::{follow_repo, user_repo},
    state::AppState,
};

async fn user_id_of(state: &AppState, username: &str) -> Result<i64, AppError> {
    user_repo::get_by_name(&state.db, username)
        .await?
        .map(|u| u.id)
        .ok_or(AppError::NotFound("user"))
}

pub async fn followers(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let user_id = user_id_of(&state, &username).await?;
    Ok(Json(follow_repo::followers(&state.db, user_id).await?))
}

pub async fn following(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let user_id = user_id_of(&state, &username).await?;
    Ok(Json(follow_repo::following(&state.db, user_id).await?))
}

pub async fn follow(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    let followee = user_id_of(&state, &username).await?;
    if followee == ctx.user_id {
        return Err(AppError::bad_request("cannot follow yourself"));
    }

    follow_repo::follow(&state.db, ctx.user_id, followee)
        .await
        .map_err(repo_err("already following", "user"))?;

    Ok(StatusCode::CREATED)
}

pub async fn unfollow(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(username): Path<String>,
) -> Result<StatusCode, AppError> {
    let followee = user_id_of(&state, &username).await?;

    if !follow_repo::unfollow(&state.db, ctx.user_id, followee).await? {
        return Err(AppError::NotFound("follow"));
    }
    Ok(StatusCode::NO_CONTENT)
}
