pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthUser};
pub use cors::create_cors;
