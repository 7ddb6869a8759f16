/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::{AuthService, jwt::JwtCodec, lookup::PgAccountLookup};

pub fn build_auth_service(config: &Config, pool: PgPool) -> Arc<AuthService> {
    let jwt = JwtCodec::new(&config.jwt_secret, config.access_token_ttl_seconds);
    let lookup = Arc::new(PgAccountLookup::new(pool));

    Arc::new(AuthService::new(jwt, lookup))
}
