/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware (guard) が検証して request extensions に格納し、handler はこの型だけを受け取る
 */
/// 認可済みのリクエストに付与されるコンテキスト
///
/// - `user_id` はトークンに埋め込まれた呼び出し元のユーザーID
/// - guard の種類 (identity / ownership / existence) の検査は通過済み
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
}

impl AuthCtx {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
