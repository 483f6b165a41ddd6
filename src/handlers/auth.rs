use axum::{Json, extract::State};
use tracing::info;

use crate::middleware::{ValidForm, ValidJson};
use crate::types::{LoginForm, RegisterUserRequest, RegistrationAck, Token};
use crate::{NaviconomyError, router::NaviconomyState};

/// POST /auth/ -> creates an account from `{username, email, password}`.
pub async fn register(
    State(state): State<NaviconomyState>,
    ValidJson(request): ValidJson<RegisterUserRequest>,
) -> Result<Json<RegistrationAck>, NaviconomyError> {
    info!(username = %request.username, "registration requested");
    Ok(Json(state.auth.register(request).await?))
}

/// POST /auth/token -> exchanges form credentials for a bearer token.
pub async fn login(
    State(state): State<NaviconomyState>,
    ValidForm(form): ValidForm<LoginForm>,
) -> Result<Json<Token>, NaviconomyError> {
    let username = form.username.clone();
    let token = state.auth.login(form).await?;
    info!(%username, "access token issued");
    Ok(Json(token))
}
