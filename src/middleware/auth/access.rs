//! access token 検証 + 認可 → AuthCtx を extensions に入れる
//!
//! route ごとに `Capability` (identity / ownership / existence) を指定して掛ける guard。
//! - トークンは `x-jwt-token` ヘッダ (無ければ `Authorization: Bearer <jwt>`)
//! - 署名 → 期限 → 対象の検査 の順。どこで落ちても応答は同じ (期限切れのみ TOKEN_EXPIRED)
//! - ストア障害は 500

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use chrono::Utc;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::policy::Capability;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "x-jwt-token";

#[derive(Clone)]
struct Guard {
    state: AppState,
    capability: Capability,
}

/// `method_router` の全メソッドに `capability` の検査を掛ける。
///
/// `route_layer` なので、検査は routing の後 (Path が取れる) かつ handler の extractor より前。
///
/// 例：
/// ```ignore
/// .route("/posts/{id}", get(get_post).merge(guard(
///     put(update_post).delete(delete_post),
///     &state,
///     Capability::Ownership(ResourceKind::Post),
/// )))
/// ```
pub fn guard(
    method_router: MethodRouter<AppState>,
    state: &AppState,
    capability: Capability,
) -> MethodRouter<AppState> {
    let guard = Guard {
        state: state.clone(),
        capability,
    };
    method_router.route_layer(middleware::from_fn_with_state(guard, access_middleware))
}

async fn access_middleware(
    State(guard): State<Guard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    // Existence routes may have no path params at all
    let params = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, &guard)
        .await
    {
        Ok(Path(params)) => params,
        Err(_) => HashMap::new(),
    };

    let verified = guard
        .state
        .auth
        .authorize_route(
            credential(&parts.headers),
            guard.capability,
            &params,
            Utc::now(),
        )
        .await?;

    tracing::debug!(
        user_id = verified.user_id,
        capability = ?guard.capability,
        expires_at = %verified.expires_at,
        "request authorized"
    );

    // middleware → extractor への受け渡し
    parts.extensions.insert(AuthCtx::new(verified.user_id));

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// A blank `x-jwt-token` counts as absent, so `Authorization` is still consulted.
fn credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(non_blank)
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .and_then(non_blank)
        })
}

fn non_blank(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::to_bytes,
        http::StatusCode,
        routing::{delete, get, post, put},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::extractors::AuthCtxExtractor;
    use crate::services::auth::jwt::JwtCodec;
    use crate::services::auth::lookup::{AccountLookup, memory::MemoryLookup};
    use crate::services::auth::policy::ResourceKind;

    async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> String {
        ctx.user_id.to_string()
    }

    async fn public() -> &'static str {
        "public"
    }

    fn app(lookup: Arc<dyn AccountLookup>) -> (Router, AppState) {
        let state = AppState::for_tests(lookup);
        let router = Router::new()
            .route(
                "/users/{username}",
                get(public).merge(guard(put(whoami), &state, Capability::Identity)),
            )
            .route(
                "/posts/{id}",
                get(public).merge(guard(
                    delete(whoami),
                    &state,
                    Capability::Ownership(ResourceKind::Post),
                )),
            )
            .route(
                "/comments/{id}",
                guard(
                    put(whoami),
                    &state,
                    Capability::Ownership(ResourceKind::Comment),
                ),
            )
            .route("/feed", guard(post(whoami), &state, Capability::Existence))
            .with_state(state.clone());
        (router, state)
    }

    fn fixture() -> Arc<dyn AccountLookup> {
        Arc::new(
            MemoryLookup::new()
                .with_user(42, "alice")
                .with_user(7, "bob")
                .with_post(1, 42)
                .with_post(2, 7)
                .with_comment(10, 1, 7),
        )
    }

    fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
        let res = router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn denied_body() -> Value {
        json!({"error": {"code": "PERMISSION_DENIED", "message": "permission denied"}})
    }

    fn token(state: &AppState, user_id: i64) -> String {
        state.auth.issue_access_token(user_id).unwrap().token
    }

    #[tokio::test]
    async fn ownership_end_to_end() {
        let (router, state) = app(fixture());
        let t42 = token(&state, 42);

        // post 1 belongs to 42
        let (status, body) = send(&router, request("DELETE", "/posts/1", Some(&t42))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");

        // post 2 belongs to 7
        let (status, body) = send(&router, request("DELETE", "/posts/2", Some(&t42))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());

        // no such post: same answer, not a 500
        let (status, body) = send(&router, request("DELETE", "/posts/999", Some(&t42))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());

        // comment 10 was written by 7 on 42's post
        let (status, _) = send(&router, request("PUT", "/comments/10", Some(&t42))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let t7 = token(&state, 7);
        let (status, body) = send(&router, request("PUT", "/comments/10", Some(&t7))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "7");
    }

    #[tokio::test]
    async fn identity_compares_path_user() {
        let (router, state) = app(fixture());

        let (status, body) =
            send(&router, request("PUT", "/users/alice", Some(&token(&state, 42)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");

        let (status, body) =
            send(&router, request("PUT", "/users/alice", Some(&token(&state, 7)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());

        // unknown user looks exactly like the wrong user
        let (status, body) =
            send(&router, request("PUT", "/users/nobody", Some(&token(&state, 7)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());
    }

    #[tokio::test]
    async fn unguarded_methods_stay_public() {
        let (router, _) = app(fixture());

        let (status, body) = send(&router, request("GET", "/posts/2", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "public");

        let (status, _) = send(&router, request("DELETE", "/posts/2", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn existence_rejects_unknown_account() {
        let (router, state) = app(fixture());

        let (status, _) = send(&router, request("POST", "/feed", Some(&token(&state, 7)))).await;
        assert_eq!(status, StatusCode::OK);

        // valid signature and expiry, but user 1234 does not exist
        let (status, body) =
            send(&router, request("POST", "/feed", Some(&token(&state, 1234)))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());
    }

    #[tokio::test]
    async fn bearer_header_is_accepted() {
        let (router, state) = app(fixture());
        let req = Request::builder()
            .method("POST")
            .uri("/feed")
            .header(header::AUTHORIZATION, format!("Bearer {}", token(&state, 42)))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn blank_token_header_falls_back_to_bearer() {
        let (router, state) = app(fixture());

        for blank in ["", "   "] {
            let req = Request::builder()
                .method("POST")
                .uri("/feed")
                .header(TOKEN_HEADER, blank)
                .header(header::AUTHORIZATION, format!("Bearer {}", token(&state, 42)))
                .body(Body::empty())
                .unwrap();

            let (status, body) = send(&router, req).await;
            assert_eq!(status, StatusCode::OK, "{blank:?}");
            assert_eq!(body, "42");
        }
    }

    #[tokio::test]
    async fn expired_token_asks_for_a_new_login() {
        let (router, _) = app(fixture());
        let issued_at = Utc::now() - chrono::Duration::hours(1);
        let stale = JwtCodec::new("test-secret", 900)
            .issue(42, issued_at)
            .unwrap()
            .token;

        let (status, body) = send(&router, request("DELETE", "/posts/1", Some(&stale))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_denied() {
        let (router, _) = app(fixture());
        let forged = JwtCodec::new("someone-else", 900)
            .issue(42, Utc::now())
            .unwrap()
            .token;

        // 42 owns post 1, but the signature does not hold
        let (status, body) = send(&router, request("DELETE", "/posts/1", Some(&forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());
    }

    #[tokio::test]
    async fn bad_tokens_are_uniformly_denied() {
        let (router, _) = app(fixture());

        for token in [None, Some("garbage"), Some("a.b.c")] {
            let (status, body) = send(&router, request("POST", "/feed", token)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), denied_body());
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_500() {
        let (router, state) = app(Arc::new(MemoryLookup::broken()));

        let (status, body) = send(&router, request("POST", "/feed", Some(&token(&state, 42)))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("INTERNAL_SERVER_ERROR"));
    }
}
