/*
 * Responsibility
 * - /posts/{id} の参照・更新・削除 (更新系は Ownership(Post) guard 済み)
 * - /posts/{id}/comments の一覧・投稿
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            comments::{CommentRequest, CommentResponse},
            posts::{PostResponse, UpdatePostRequest},
        },
        extractors::{AuthCtxExtractor, Pagination},
        handlers::repo_err,
    },
    error::AppError,
    repos::{comment_repo, post_repo},
    state::AppState,
};

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<PostResponse>, AppError> {
    let row = post_repo::get(&state.db, post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    Ok(Json(PostResponse::from(row)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let media_url: Option<Option<&str>> = req.media_url.as_ref().map(|inner| inner.as_deref());

    let row = post_repo::update(&state.db, post_id, req.content.as_deref(), media_url)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    Ok(Json(PostResponse::from(row)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !post_repo::delete(&state.db, post_id).await? {
        return Err(AppError::NotFound("post"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    page: Pagination,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    if post_repo::get(&state.db, post_id).await?.is_none() {
        return Err(AppError::NotFound("post"));
    }

    let rows = comment_repo::list_by_post(&state.db, post_id, page.limit, page.offset).await?;
    Ok(Json(rows.into_iter().map(CommentResponse::from).collect()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(post_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    // post が無ければ FK 違反 → 404
    let row = comment_repo::create(&state.db, post_id, ctx.user_id, &req.text)
        .await
        .map_err(repo_err("comment already exists", "post"))?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(row))))
}
