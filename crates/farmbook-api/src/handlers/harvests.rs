use axum::{
    extract::{Path, State},
    Json,
};
use farmbook_db::{HarvestChanges, NewHarvest};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{registry_error, ApiResult};
use crate::models::*;
use crate::AppState;

/// List all harvests
#[utoipa::path(
    get,
    path = "/api/v1/harvests",
    responses(
        (status = 200, description = "List of harvests", body = [Harvest]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "harvests"
)]
pub async fn list_harvests(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Harvest>> {
    let harvests = state
        .registry
        .list_harvests()
        .await
        .map_err(registry_error)?;

    Ok(Json(harvests.into_iter().map(Harvest::from).collect()))
}

/// Get a harvest by ID
#[utoipa::path(
    get,
    path = "/api/v1/harvests/{id}",
    params(
        ("id" = i32, Path, description = "Harvest ID")
    ),
    responses(
        (status = 200, description = "Harvest", body = Harvest),
        (status = 404, description = "Harvest not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "harvests"
)]
pub async fn get_harvest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Harvest> {
    debug!("Getting harvest: {}", id);

    let harvest = state.registry.get_harvest(id).await.map_err(registry_error)?;

    Ok(Json(harvest.into()))
}

/// Harvests of one crop year
#[utoipa::path(
    get,
    path = "/api/v1/harvests/year/{year}",
    params(
        ("year" = i32, Path, description = "Crop year")
    ),
    responses(
        (status = 200, description = "Harvests of the year", body = [Harvest]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "harvests"
)]
pub async fn harvests_of_year(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> ApiResult<Vec<Harvest>> {
    let harvests = state
        .registry
        .harvests_of_year(year)
        .await
        .map_err(registry_error)?;

    Ok(Json(harvests.into_iter().map(Harvest::from).collect()))
}

/// Record a harvest
#[utoipa::path(
    post,
    path = "/api/v1/harvests",
    request_body = CreateHarvestRequest,
    responses(
        (status = 200, description = "Harvest created", body = Envelope),
        (status = 400, description = "Farm does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "harvests"
)]
pub async fn create_harvest(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateHarvestRequest>,
) -> ApiResult<Envelope> {
    info!(
        "Creating harvest: {} {} on farm {}",
        req.crop, req.year, req.farm_id
    );

    let created = state
        .registry
        .create_harvest(NewHarvest {
            year: req.year,
            crop: req.crop,
            farm_id: req.farm_id,
        })
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Harvest created successfully",
        json!(Harvest::from(created)),
    )))
}

/// Update a harvest
#[utoipa::path(
    put,
    path = "/api/v1/harvests/{id}",
    params(
        ("id" = i32, Path, description = "Harvest ID")
    ),
    request_body = UpdateHarvestRequest,
    responses(
        (status = 200, description = "Harvest updated", body = Envelope),
        (status = 400, description = "Farm does not exist", body = ErrorResponse),
        (status = 404, description = "Harvest not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "harvests"
)]
pub async fn update_harvest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateHarvestRequest>,
) -> ApiResult<Envelope> {
    info!("Updating harvest: {}", id);

    let updated = state
        .registry
        .update_harvest(
            id,
            HarvestChanges {
                year: req.year,
                crop: req.crop,
                farm_id: req.farm_id,
            },
        )
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Harvest updated successfully",
        json!(Harvest::from(updated)),
    )))
}

/// Delete a harvest
#[utoipa::path(
    delete,
    path = "/api/v1/harvests/{id}",
    params(
        ("id" = i32, Path, description = "Harvest ID")
    ),
    responses(
        (status = 200, description = "Harvest deleted", body = Envelope),
        (status = 404, description = "Harvest not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "harvests"
)]
pub async fn delete_harvest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Envelope> {
    info!("Deleting harvest: {}", id);

    state
        .registry
        .delete_harvest(id)
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Harvest deleted successfully",
        json!({ "harvest_id": id }),
    )))
}
