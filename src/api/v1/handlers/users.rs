/*
 * Responsibility
 * - /users/{username} のプロフィール参照・更新・削除
 * - /users/{username}/posts の一覧・投稿
 * - 更新系は Identity guard 済み (path の user == caller) なので caller の id で操作する
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            posts::{CreatePostRequest, PostResponse},
            users::{ProfileResponse, UpdateUserRequest, UserResponse},
        },
        extractors::{AuthCtxExtractor, Pagination},
        handlers::repo_err,
    },
    error::AppError,
    repos::{
        post_repo,
        user_repo::{self, UserChanges},
    },
    services::password::hash_password,
    state::AppState,
};

pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let row = user_repo::profile(&state.db, &username)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(ProfileResponse::from(row)))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let password_hash = req.password.as_deref().map(hash_password).transpose()?;
    let changes = UserChanges {
        username: req.user_name.as_deref(),
        name: req.name.as_deref().map(str::trim),
        email: req.email.as_deref(),
        bio: req.bio.as_deref(),
        password_hash: password_hash.as_deref(),
    };

    let row = user_repo::update(&state.db, ctx.user_id, changes)
        .await
        .map_err(repo_err("userName already taken", "user"))?
        .ok_or(AppError::NotFound("user"))?;

    Ok(Json(UserResponse::from(row)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<StatusCode, AppError> {
    if !user_repo::delete(&state.db, ctx.user_id).await? {
        return Err(AppError::NotFound("user"));
    }

    tracing::info!(user_id = ctx.user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    page: Pagination,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let user = user_repo::get_by_name(&state.db, &username)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let rows = post_repo::list_by_user(&state.db, user.id, page.limit, page.offset).await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = post_repo::create(
        &state.db,
        ctx.user_id,
        &req.content,
        req.media_url.as_deref(),
    )
    .await
    .map_err(repo_err("post already exists", "user"))?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(row))))
}
