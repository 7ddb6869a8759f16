pub mod auth_ctx;
pub mod pagination;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use pagination::Pagination;
