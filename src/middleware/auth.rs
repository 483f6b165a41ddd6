use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::TypedHeader;
use axum_extra::typed_header::TypedHeaderRejection;
use headers::Authorization;
use headers::authorization::Bearer;

use crate::auth::current_active_user;
use crate::error::NaviconomyError;
use crate::router::NaviconomyState;
use crate::types::User;

const NOT_AUTHENTICATED: &str = "Not authenticated.";

/// Gate for every protected route.
///
/// Requires `Authorization: Bearer <token>` naming an existing active account
/// and stores the resolved [`CurrentUser`] in the request extensions.
pub async fn require_active_user(
    State(state): State<NaviconomyState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut req: Request,
    next: Next,
) -> Result<Response, NaviconomyError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.map_err(|_| NaviconomyError::InvalidToken(NOT_AUTHENTICATED.to_string()))?;

    let user = current_active_user(
        state.auth.tokens(),
        state.auth.accounts(),
        bearer.token(),
    )
    .await?;

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Identity resolved by [`require_active_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = NaviconomyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| NaviconomyError::InvalidToken(NOT_AUTHENTICATED.to_string()))
    }
}
