/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, auth: AuthService
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}

#[cfg(test)]
impl AppState {
    /// DB に繋がない state (pool は lazy、認可は差し替えた lookup を見る)
    pub fn for_tests(lookup: Arc<dyn crate::services::auth::lookup::AccountLookup>) -> Self {
        use crate::services::auth::jwt::JwtCodec;

        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap();
        let auth = Arc::new(AuthService::new(JwtCodec::new("test-secret", 900), lookup));
        Self { db, auth }
    }
}
