/*
 * Responsibility
 * - Users の request/response DTO
 * - password_hash は response に載せない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BIO_MAX, NAME_MAX, check_email, check_password, check_username};
use crate::repos::user_repo::{ProfileRow, UserRow};

/// PUT/PATCH 共通。欠けているフィールドは変更しない。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(user_name) = &self.user_name {
            check_username(user_name)?;
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("name cannot be empty");
            }
            if name.chars().count() > NAME_MAX {
                return Err("name must be <= 64 chars");
            }
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(bio) = &self.bio
            && bio.chars().count() > BIO_MAX
        {
            return Err("bio must be <= 280 chars");
        }
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "userID")]
    pub id: i64,
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            user_name: row.username,
            name: row.name,
            email: row.email,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(rename = "userID")]
    pub id: i64,
    pub user_name: String,
    pub name: String,
    pub bio: String,
    pub posts: i64,
    pub followers: i64,
    pub following: i64,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user_name: row.username,
            name: row.name,
            bio: row.bio,
            posts: row.posts,
            followers: row.followers,
            following: row.following,
        }
    }
}
