pub mod access;

pub use access::{TOKEN_HEADER, guard};
