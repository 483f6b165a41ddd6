pub mod auth;
pub mod rate_limit;
pub mod validation;

pub use auth::{CurrentUser, require_active_user};
pub use rate_limit::{RateLimits, limit_registration, limit_requests};
pub use validation::{ValidForm, ValidJson, ValidPath};
