use serde::{Deserialize, Serialize};

use super::{BIO_MAX, NAME_MAX, check_email, check_password, check_username};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub user_name: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    pub password: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_username(&self.user_name)?;
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.name.chars().count() > NAME_MAX {
            return Err("name must be <= 64 chars");
        }
        check_email(&self.email)?;
        if self.bio.chars().count() > BIO_MAX {
            return Err("bio must be <= 280 chars");
        }
        check_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_name: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.user_name.is_empty() || self.password.is_empty() {
            return Err("userName and password are required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_name: String,
    pub token: String,
    /// seconds
    pub expires_in: u64,
}
