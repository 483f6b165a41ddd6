//! Accounts, credentials and bearer tokens.
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`token`]: HMAC-signed JWT issue/verify with an injectable clock
//! - [`accounts`]: account lookup and creation with uniqueness checks
//! - [`service`]: registration and login flows
//! - [`guard`]: bearer token to active identity, run before protected routes

pub mod accounts;
pub mod guard;
pub mod password;
pub mod service;
pub mod token;

pub use accounts::AccountDirectory;
pub use guard::current_active_user;
pub use service::AuthService;
pub use token::{Claims, Clock, SystemClock, TokenData, TokenService};
