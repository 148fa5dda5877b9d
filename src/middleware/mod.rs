pub mod auth;
pub mod response;

pub use auth::{require_administrator, require_authenticated, require_same_identity};
pub use response::{ApiResponse, ApiResult};
