//! Request payloads and immutable response values.

pub mod account;
pub mod brand;
pub mod octane;
pub mod refill;

pub use account::{LoginForm, RegisterUserRequest, RegistrationAck, Token, User};
pub use brand::{Brand, BrandCreate, BrandUpdate};
pub use octane::{Octane, OctaneCreate, OctaneUpdate};
pub use refill::{Refill, RefillCreate, RefillUpdate};

use crate::error::NaviconomyError;

/// Field-level checks run before any domain logic.
pub trait Validate {
    fn validate(&self) -> Result<(), NaviconomyError>;
}

pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), NaviconomyError> {
    if value.trim().is_empty() {
        return Err(NaviconomyError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(NaviconomyError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
