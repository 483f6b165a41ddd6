use axum::{Json, extract::State};
use tracing::info;

use crate::middleware::{CurrentUser, ValidJson, ValidPath};
use crate::types::{Octane, OctaneCreate, OctaneUpdate};
use crate::{NaviconomyError, router::NaviconomyState};

/// POST /octane/
pub async fn create_octane(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidJson(params): ValidJson<OctaneCreate>,
) -> Result<Json<Octane>, NaviconomyError> {
    let octane = state.repos.octanes.create(params).await?;
    info!(user = %user.username, octane_id = octane.id, grade = octane.grade, "octane created");
    Ok(Json(octane))
}

/// GET /octane/
pub async fn list_octanes(
    State(state): State<NaviconomyState>,
) -> Result<Json<Vec<Octane>>, NaviconomyError> {
    Ok(Json(state.repos.octanes.list().await?))
}

/// GET /octane/{id}
pub async fn read_octane(
    State(state): State<NaviconomyState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Octane>, NaviconomyError> {
    Ok(Json(state.repos.octanes.read(id).await?))
}

/// PUT /octane/{id}
pub async fn update_octane(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(params): ValidJson<OctaneUpdate>,
) -> Result<Json<Octane>, NaviconomyError> {
    let octane = state.repos.octanes.update(id, params).await?;
    info!(user = %user.username, octane_id = id, "octane updated");
    Ok(Json(octane))
}

/// DELETE /octane/{id}
pub async fn delete_octane(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Octane>, NaviconomyError> {
    let octane = state.repos.octanes.delete(id).await?;
    info!(user = %user.username, octane_id = id, "octane deleted");
    Ok(Json(octane))
}
