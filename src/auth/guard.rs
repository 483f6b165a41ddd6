use crate::auth::accounts::AccountDirectory;
use crate::auth::token::TokenService;
use crate::error::NaviconomyError;
use crate::types::User;

const UNKNOWN_SUBJECT: &str = "Invalid credentials.";
const INACTIVE_ACCOUNT: &str = "Account has been disabled or deactivated.";

/// Resolve a bearer token to an active user.
///
/// A subject that no longer resolves fails exactly like a bad token so
/// account existence is not revealed.
pub async fn current_active_user(
    tokens: &TokenService,
    accounts: &AccountDirectory,
    token: &str,
) -> Result<User, NaviconomyError> {
    let data = tokens.verify(token)?;
    let user: User = accounts
        .find_by_username(&data.subject)
        .await?
        .ok_or_else(|| NaviconomyError::InvalidToken(UNKNOWN_SUBJECT.to_string()))?
        .into();

    if !user.is_active {
        return Err(NaviconomyError::InvalidAccount(INACTIVE_ACCOUNT.to_string()));
    }
    Ok(user)
}
