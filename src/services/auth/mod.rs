pub mod factory;
pub mod jwt;
pub mod lookup;
pub mod policy;
pub mod service;

pub use factory::build_auth_service;
pub use service::AuthService;
