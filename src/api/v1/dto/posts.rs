use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{CONTENT_MAX, MEDIA_URL_MAX};
use crate::repos::post_repo::PostRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: String,
    pub media_url: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_content(&self.content)?;
        if let Some(url) = &self.media_url {
            check_media_url(url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (clear)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "present")]
    pub media_url: Option<Option<String>>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(content) = &self.content {
            check_content(content)?;
        }
        if let Some(Some(url)) = &self.media_url {
            check_media_url(url)?;
        }
        Ok(())
    }
}

/// 存在するフィールドは null でも Some(None) にする
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

fn check_content(content: &str) -> Result<(), &'static str> {
    if content.trim().is_empty() {
        return Err("content is required");
    }
    if content.chars().count() > CONTENT_MAX {
        return Err("content must be <= 2000 chars");
    }
    Ok(())
}

fn check_media_url(url: &str) -> Result<(), &'static str> {
    if url.len() > MEDIA_URL_MAX {
        return Err("mediaUrl must be <= 2048 chars");
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err("mediaUrl must be an http(s) URL");
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[serde(rename = "postID")]
    pub id: i64,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            media_url: row.media_url,
            created_at: row.created_at,
            edited_at: row.edited_at,
        }
    }
}
