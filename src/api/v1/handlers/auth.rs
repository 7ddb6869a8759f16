/*
 * Responsibility
 * - POST /signup: argon2 でハッシュ化して users に保存
 * - POST /login: パスワード照合 → access token 発行
 * - 「ユーザーがいない」と「パスワード違い」は同じ INVALID_CREDENTIALS
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::{
            auth::{LoginRequest, LoginResponse, SignupRequest},
            users::UserResponse,
        },
        handlers::repo_err,
    },
    error::AppError,
    repos::user_repo::{self, NewUser},
    services::password::{hash_password, verify_password},
    state::AppState,
};

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let password_hash = hash_password(&req.password)?;
    let row = user_repo::create(
        &state.db,
        NewUser {
            username: &req.user_name,
            name: req.name.trim(),
            email: &req.email,
            bio: &req.bio,
            password_hash: &password_hash,
        },
    )
    .await
    .map_err(repo_err("userName already taken", "user"))?;

    tracing::info!(user_id = row.id, "user signed up");
    Ok((StatusCode::CREATED, Json(UserResponse::from(row))))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let user = user_repo::get_by_name(&state.db, &req.user_name)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(user_id = user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let issued = state.auth.issue_access_token(user.id)?;
    tracing::info!(user_id = user.id, expires_at = %issued.expires_at, "access token issued");

    Ok(Json(LoginResponse {
        user_name: user.username,
        token: issued.token,
        expires_in: state.auth.access_token_ttl_seconds(),
    }))
}
