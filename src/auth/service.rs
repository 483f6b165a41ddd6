use crate::auth::accounts::AccountDirectory;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::error::NaviconomyError;
use crate::types::{LoginForm, RegisterUserRequest, RegistrationAck, Token};
use tracing::{error, info};

const USERNAME_TAKEN: &str = "Username has already been taken.";
const EMAIL_TAKEN: &str = "Email has already been taken.";
const BAD_CREDENTIALS: &str = "Invalid username or password.";

/// Registration and login flows.
#[derive(Clone)]
pub struct AuthService {
    accounts: AccountDirectory,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(accounts: AccountDirectory, tokens: TokenService) -> Self {
        Self { accounts, tokens }
    }

    pub fn accounts(&self) -> &AccountDirectory {
        &self.accounts
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create an account after checking username, then email, for collisions.
    pub async fn register(
        &self,
        request: RegisterUserRequest,
    ) -> Result<RegistrationAck, NaviconomyError> {
        if let Some(existing) = self
            .accounts
            .find_conflict(&request.username, &request.email)
            .await?
        {
            let message = if existing.username == request.username {
                USERNAME_TAKEN
            } else {
                EMAIL_TAKEN
            };
            return Err(NaviconomyError::RegistrationConflict(message.to_string()));
        }

        let password = request.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing task failed");
                NaviconomyError::service_unavailable()
            })??;

        let account = self
            .accounts
            .create(&request.username, &request.email, &password_hash)
            .await?;
        info!(username = %account.username, "account created");

        Ok(RegistrationAck {
            detail: format!("Welcome to Naviconomy, {}!", account.username),
        })
    }

    /// Exchange a username/password pair for a bearer token.
    ///
    /// Unknown users and wrong passwords fail identically. Active status is
    /// not checked here; the identity guard rejects inactive accounts.
    pub async fn login(&self, form: LoginForm) -> Result<Token, NaviconomyError> {
        let bad_credentials = || NaviconomyError::AuthenticationFailed(BAD_CREDENTIALS.to_string());

        let account = self
            .accounts
            .find_by_username(&form.username)
            .await?
            .ok_or_else(bad_credentials)?;

        let hash = account.hashed_password;
        let password = form.password;
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| {
                error!(error = %e, "password verification task failed");
                NaviconomyError::service_unavailable()
            })?;
        if !verified {
            return Err(bad_credentials());
        }

        let access_token = self.tokens.issue(&account.username)?;
        Ok(Token::bearer(access_token))
    }
}
