use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::fmt;
use thiserror::Error as ThisError;
use tracing::{error, warn};

pub const SERVICE_UNAVAILABLE: &str = "A service seems to be down. Please try again later.";

/// Foreign relation a refill holds. Named in related-entity errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Brand,
    Octane,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Brand => f.write_str("Brand"),
            Relation::Octane => f.write_str("Octane"),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum NaviconomyError {
    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    RelatedEntityNotFound { relation: Relation, message: String },

    #[error("{0}")]
    RegistrationConflict(String),

    #[error("{0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("{0}")]
    InvalidAccount(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl NaviconomyError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        NaviconomyError::NotFound(format!("{entity} with id {id} does not exist."))
    }

    pub fn related_not_found(relation: Relation, id: i64) -> Self {
        NaviconomyError::RelatedEntityNotFound {
            relation,
            message: format!("{relation} with id {id} does not exist."),
        }
    }

    pub fn service_unavailable() -> Self {
        NaviconomyError::ServiceUnavailable(SERVICE_UNAVAILABLE.to_string())
    }

    /// Status code for each error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            NaviconomyError::ServiceUnavailable(_) | NaviconomyError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            NaviconomyError::AlreadyExists(_) => StatusCode::CONFLICT,
            NaviconomyError::NotFound(_) => StatusCode::NOT_FOUND,
            NaviconomyError::RelatedEntityNotFound { .. } | NaviconomyError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            NaviconomyError::RegistrationConflict(_)
            | NaviconomyError::AuthenticationFailed(_)
            | NaviconomyError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            NaviconomyError::InvalidAccount(_) => StatusCode::FORBIDDEN,
            NaviconomyError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Client-facing message. Related-entity errors carry the relation name.
    pub fn detail(&self) -> String {
        match self {
            NaviconomyError::RelatedEntityNotFound { relation, message } => {
                format!("{message} [{relation}]")
            }
            NaviconomyError::Config(_) => SERVICE_UNAVAILABLE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SqlxError> for NaviconomyError {
    fn from(e: SqlxError) -> Self {
        error!(error = %e, "storage operation failed");
        NaviconomyError::service_unavailable()
    }
}

impl IntoResponse for NaviconomyError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), detail = %self.detail(), "request rejected");
        }
        (
            status,
            Json(ApiErrorResponse {
                detail: self.detail(),
            }),
        )
            .into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_entity_detail_names_the_relation() {
        let err = NaviconomyError::related_not_found(Relation::Brand, 7);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.detail(), "Brand with id 7 does not exist. [Brand]");
    }

    #[test]
    fn status_table_matches_error_kinds() {
        let cases = [
            (NaviconomyError::service_unavailable(), 500),
            (NaviconomyError::AlreadyExists("x".into()), 409),
            (NaviconomyError::not_found("Brand", 1), 404),
            (NaviconomyError::RegistrationConflict("x".into()), 401),
            (NaviconomyError::AuthenticationFailed("x".into()), 401),
            (NaviconomyError::InvalidToken("x".into()), 401),
            (NaviconomyError::InvalidAccount("x".into()), 403),
            (NaviconomyError::Validation("x".into()), 422),
            (NaviconomyError::RateLimited("x".into()), 429),
        ];
        for (err, code) in cases {
            assert_eq!(err.status().as_u16(), code, "{err:?}");
        }
    }

    #[test]
    fn config_errors_do_not_leak_details() {
        let err = NaviconomyError::Config("secret_key missing".into());
        assert_eq!(err.detail(), SERVICE_UNAVAILABLE);
    }

    #[test]
    fn storage_errors_become_service_unavailable() {
        let err: NaviconomyError = SqlxError::RowNotFound.into();
        assert!(matches!(err, NaviconomyError::ServiceUnavailable(_)));
        assert_eq!(err.detail(), SERVICE_UNAVAILABLE);
    }
}
