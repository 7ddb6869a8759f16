/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 参照系 (GET) は公開、更新系は method 単位で guard を掛ける
 *   - Identity: path の {username} が caller 本人
 *   - Ownership: path の {id} の post/comment を caller が所有
 *   - Existence: caller のアカウントが存在する
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::auth::guard;
use crate::services::auth::policy::{Capability, ResourceKind};
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, signup},
    comments::{delete_comment, get_comment, update_comment},
    follows::{follow, followers, following, unfollow},
    health::health,
    likes::{comment_likers, like_comment, like_post, post_likers, unlike_comment, unlike_post},
    posts::{create_comment, delete_post, get_post, list_comments, update_post},
    users::{create_post, delete_user, get_profile, list_posts, update_user},
};

pub fn routes(state: &AppState) -> Router<AppState> {
    let identity = Capability::Identity;
    let owns_post = Capability::Ownership(ResourceKind::Post);
    let owns_comment = Capability::Ownership(ResourceKind::Comment);
    let existing = Capability::Existence;

    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
        .route("/login", post(login))
        // users
        .route(
            "/users/{username}",
            get(get_profile).merge(guard(
                put(update_user)
                    .patch(update_user)
                    .delete(delete_user),
                state,
                identity,
            )),
        )
        .route(
            "/users/{username}/posts",
            get(list_posts).merge(guard(post(create_post), state, identity)),
        )
        .route("/users/{username}/followers", get(followers))
        .route("/users/{username}/following", get(following))
        .route(
            "/users/{username}/follow",
            guard(post(follow).delete(unfollow), state, existing),
        )
        // posts
        .route(
            "/posts/{id}",
            get(get_post).merge(guard(
                put(update_post)
                    .patch(update_post)
                    .delete(delete_post),
                state,
                owns_post,
            )),
        )
        .route(
            "/posts/{id}/comments",
            get(list_comments).merge(guard(post(create_comment), state, existing)),
        )
        .route("/posts/{id}/likes", get(post_likers))
        .route(
            "/posts/{id}/like",
            guard(post(like_post).delete(unlike_post), state, existing),
        )
        // comments
        .route(
            "/comments/{id}",
            get(get_comment).merge(guard(
                put(update_comment)
                    .patch(update_comment)
                    .delete(delete_comment),
                state,
                owns_comment,
            )),
        )
        .route("/comments/{id}/likes", get(comment_likers))
        .route(
            "/comments/{id}/like",
            guard(post(like_comment).delete(unlike_comment), state, existing),
        )
}
