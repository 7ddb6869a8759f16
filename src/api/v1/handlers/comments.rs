use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::comments::{CommentRequest, CommentResponse},
    error::AppError,
    repos::comment_repo,
    state::AppState,
};

pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<CommentResponse>, AppError> {
    let row = comment_repo::get(&state.db, comment_id)
        .await?
        .ok_or(AppError::NotFound("comment"))?;

    Ok(Json(CommentResponse::from(row)))
}

/// Ownership(Comment) guard 済み
pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = comment_repo::update(&state.db, comment_id, &req.text)
        .await?
        .ok_or(AppError::NotFound("comment"))?;

    Ok(Json(CommentResponse::from(row)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !comment_repo::delete(&state.db, comment_id).await? {
        return Err(AppError::NotFound("comment"));
    }
    Ok(StatusCode::NO_CONTENT)
}
