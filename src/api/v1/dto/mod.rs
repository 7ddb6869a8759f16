/*
 * Responsibility
 * - request/response DTO (JSON は camelCase)
 * - request 側は validate() で形式チェック → handler で 400 に変換
 */
pub mod auth;
pub mod comments;
pub mod posts;
pub mod users;

pub const USERNAME_MAX: usize = 32;
pub const NAME_MAX: usize = 64;
pub const EMAIL_MAX: usize = 254;
pub const BIO_MAX: usize = 280;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;
pub const CONTENT_MAX: usize = 2000;
pub const MEDIA_URL_MAX: usize = 2048;
pub const COMMENT_MAX: usize = 1000;

/// 英数字と `_` のみ。URL の path segment にそのまま載せるため。
pub(crate) fn check_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err("userName is required");
    }
    if username.chars().count() > USERNAME_MAX {
        return Err("userName must be <= 32 chars");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err("userName may only contain letters, digits and '_'");
    }
    Ok(())
}

pub(crate) fn check_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("email is invalid");
    };
    if local.is_empty() || domain.is_empty() || email.len() > EMAIL_MAX {
        return Err("email is invalid");
    }
    Ok(())
}

pub(crate) fn check_password(password: &str) -> Result<(), &'static str> {
    let len = password.chars().count();
    if len < PASSWORD_MIN {
        return Err("password must be >= 8 chars");
    }
    if len > PASSWORD_MAX {
        return Err("password must be <= 128 chars");
    }
    Ok(())
}
