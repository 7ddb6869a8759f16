pub mod comment_repo;
pub mod error;
pub mod follow_repo;
pub mod like_repo;
pub mod post_repo;
pub mod user_repo;
