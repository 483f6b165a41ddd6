use serde::{Deserialize, Serialize};

use super::{Validate, check_len};
use crate::error::NaviconomyError;

pub const USERNAME_MAX_LEN: usize = 32;
pub const EMAIL_MAX_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterUserRequest {
    fn validate(&self) -> Result<(), NaviconomyError> {
        check_len("username", &self.username, USERNAME_MAX_LEN)?;
        check_len("email", &self.email, EMAIL_MAX_LEN)?;
        if !is_plausible_email(&self.email) {
            return Err(NaviconomyError::Validation(
                "email is not a valid email address".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(NaviconomyError::Validation(
                "password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// OAuth2 password-grant form. Extra form fields (`grant_type`, `scope`) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), NaviconomyError> {
        Ok(())
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationAck {
    pub detail: String,
}
