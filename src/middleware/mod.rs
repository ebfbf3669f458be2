pub mod https;
pub mod identity;
pub mod response;

pub use https::require_https_middleware;
pub use identity::identity_middleware;
pub use response::{ApiResponse, ApiResult};
