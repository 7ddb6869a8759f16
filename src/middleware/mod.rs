/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route 単位の認可 guard / それ以外は Router 全体に掛ける横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
