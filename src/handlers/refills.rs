use axum::{Json, extract::State};
use tracing::info;

use crate::middleware::{CurrentUser, ValidJson, ValidPath};
use crate::types::{Refill, RefillCreate, RefillUpdate};
use crate::{NaviconomyError, router::NaviconomyState};

/// POST /refill/ -> brand and octane must already exist.
pub async fn create_refill(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidJson(params): ValidJson<RefillCreate>,
) -> Result<Json<Refill>, NaviconomyError> {
    let refill = state.repos.refills.create(params).await?;
    info!(
        user = %user.username,
        refill_id = refill.id,
        brand_id = refill.brand_id,
        octane_id = refill.octane_id,
        "refill recorded"
    );
    Ok(Json(refill))
}

/// GET /refill/
pub async fn list_refills(
    State(state): State<NaviconomyState>,
) -> Result<Json<Vec<Refill>>, NaviconomyError> {
    Ok(Json(state.repos.refills.list().await?))
}

/// GET /refill/{id}
pub async fn read_refill(
    State(state): State<NaviconomyState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Refill>, NaviconomyError> {
    Ok(Json(state.repos.refills.read(id).await?))
}

/// PUT /refill/{id}
pub async fn update_refill(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(params): ValidJson<RefillUpdate>,
) -> Result<Json<Refill>, NaviconomyError> {
    let refill = state.repos.refills.update(id, params).await?;
    info!(user = %user.username, refill_id = id, "refill updated");
    Ok(Json(refill))
}

/// DELETE /refill/{id}
pub async fn delete_refill(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Refill>, NaviconomyError> {
    let refill = state.repos.refills.delete(id).await?;
    info!(user = %user.username, refill_id = id, "refill deleted");
    Ok(Json(refill))
}
