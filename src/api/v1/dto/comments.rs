use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::COMMENT_MAX;
use crate::repos::comment_repo::CommentRow;

/// create / update 共通 (変更できるのは本文だけ)
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("text is required");
        }
        if self.text.chars().count() > COMMENT_MAX {
            return Err("text must be <= 1000 chars");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "commentID")]
    pub id: i64,
    #[serde(rename = "postID")]
    pub post_id: i64,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_required_and_capped() {
        assert!(CommentRequest { text: "nice".into() }.validate().is_ok());
        assert!(CommentRequest { text: "   ".into() }.validate().is_err());
        assert!(
            CommentRequest {
                text: "x".repeat(COMMENT_MAX + 1)
            }
            .validate()
            .is_err()
        );
    }
}
