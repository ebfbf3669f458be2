// handlers/public/mod.rs - endpoints that do not require authentication

pub mod health;
pub mod login;

pub use health::{health_get, root_get};
pub use login::login_post;
