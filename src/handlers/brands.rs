use axum::{Json, extract::State};
use tracing::info;

use crate::middleware::{CurrentUser, ValidJson, ValidPath};
use crate::types::{Brand, BrandCreate, BrandUpdate};
use crate::{NaviconomyError, router::NaviconomyState};

/// POST /brand/
pub async fn create_brand(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidJson(params): ValidJson<BrandCreate>,
) -> Result<Json<Brand>, NaviconomyError> {
    let brand = state.repos.brands.create(params).await?;
    info!(user = %user.username, brand_id = brand.id, name = %brand.name, "brand created");
    Ok(Json(brand))
}

/// GET /brand/
pub async fn list_brands(
    State(state): State<NaviconomyState>,
) -> Result<Json<Vec<Brand>>, NaviconomyError> {
    Ok(Json(state.repos.brands.list().await?))
}

/// GET /brand/{id}
pub async fn read_brand(
    State(state): State<NaviconomyState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Brand>, NaviconomyError> {
    Ok(Json(state.repos.brands.read(id).await?))
}

/// PUT /brand/{id} -> only supplied fields change.
pub async fn update_brand(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
    ValidJson(params): ValidJson<BrandUpdate>,
) -> Result<Json<Brand>, NaviconomyError> {
    let brand = state.repos.brands.update(id, params).await?;
    info!(user = %user.username, brand_id = id, "brand updated");
    Ok(Json(brand))
}

/// DELETE /brand/{id} -> returns the removed brand.
pub async fn delete_brand(
    State(state): State<NaviconomyState>,
    CurrentUser(user): CurrentUser,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Brand>, NaviconomyError> {
    let brand = state.repos.brands.delete(id).await?;
    info!(user = %user.username, brand_id = id, "brand deleted");
    Ok(Json(brand))
}
