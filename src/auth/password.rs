use crate::error::NaviconomyError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::error;

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns a PHC-formatted string; hashing the same password twice yields
/// different strings.
pub fn hash_password(password: &str) -> Result<String, NaviconomyError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            NaviconomyError::service_unavailable()
        })
}

/// Check a password against a PHC hash. Malformed or foreign hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
