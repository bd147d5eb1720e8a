use axum::{
    extract::{Path, State},
    Json,
};
use farmbook_db::{FarmChanges, NewFarm};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{registry_error, ApiResult};
use crate::models::*;
use crate::AppState;

/// List all farms
#[utoipa::path(
    get,
    path = "/api/v1/farms",
    responses(
        (status = 200, description = "List of farms", body = [Farm]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn list_farms(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Farm>> {
    let farms = state.registry.list_farms().await.map_err(registry_error)?;

    Ok(Json(farms.into_iter().map(Farm::from).collect()))
}

/// Farm ids and names
#[utoipa::path(
    get,
    path = "/api/v1/farms/list",
    responses(
        (status = 200, description = "Farm id and name", body = [FarmListItem]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn farm_list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<FarmListItem>> {
    let farms = state.registry.list_farms().await.map_err(registry_error)?;

    Ok(Json(
        farms
            .into_iter()
            .map(|f| FarmListItem {
                id: f.id,
                name: f.name,
            })
            .collect(),
    ))
}

/// Get a farm by ID
#[utoipa::path(
    get,
    path = "/api/v1/farms/{id}",
    params(
        ("id" = i32, Path, description = "Farm ID")
    ),
    responses(
        (status = 200, description = "Farm", body = Farm),
        (status = 404, description = "Farm not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn get_farm(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> ApiResult<Farm> {
    debug!("Getting farm: {}", id);

    let farm = state.registry.get_farm(id).await.map_err(registry_error)?;

    Ok(Json(farm.into()))
}

/// Create a farm
#[utoipa::path(
    post,
    path = "/api/v1/farms",
    request_body = CreateFarmRequest,
    responses(
        (status = 200, description = "Farm created", body = Envelope),
        (status = 400, description = "Owning producer does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn create_farm(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFarmRequest>,
) -> ApiResult<Envelope> {
    info!("Creating farm: {} ({}/{})", req.name, req.city, req.state);

    let created = state
        .registry
        .create_farm(NewFarm {
            name: req.name,
            city: req.city,
            state: req.state,
            total_area: req.total_area,
            arable_area: req.arable_area,
            producer_id: req.producer_id,
        })
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Farm created successfully",
        json!(Farm::from(created)),
    )))
}

/// Update a farm
#[utoipa::path(
    put,
    path = "/api/v1/farms/{id}",
    params(
        ("id" = i32, Path, description = "Farm ID")
    ),
    request_body = UpdateFarmRequest,
    responses(
        (status = 200, description = "Farm updated", body = Envelope),
        (status = 400, description = "Owning producer does not exist", body = ErrorResponse),
        (status = 404, description = "Farm not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn update_farm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateFarmRequest>,
) -> ApiResult<Envelope> {
    info!("Updating farm: {}", id);

    let updated = state
        .registry
        .update_farm(
            id,
            FarmChanges {
                name: req.name,
                city: req.city,
                state: req.state,
                total_area: req.total_area,
                arable_area: req.arable_area,
                producer_id: req.producer_id,
            },
        )
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Farm updated successfully",
        json!(Farm::from(updated)),
    )))
}

/// Delete a farm and its harvests
#[utoipa::path(
    delete,
    path = "/api/v1/farms/{id}",
    params(
        ("id" = i32, Path, description = "Farm ID")
    ),
    responses(
        (status = 200, description = "Farm deleted", body = Envelope),
        (status = 404, description = "Farm not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn delete_farm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Envelope> {
    info!("Deleting farm: {}", id);

    let deletion = state.registry.delete_farm(id).await.map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Farm deleted successfully",
        json!({
            "farm_id": deletion.farm_id,
            "harvests_deleted": deletion.harvests_deleted,
        }),
    )))
}

/// Harvests recorded for a farm
#[utoipa::path(
    get,
    path = "/api/v1/farms/{id}/harvests",
    params(
        ("id" = i32, Path, description = "Farm ID")
    ),
    responses(
        (status = 200, description = "Harvests of the farm", body = [Harvest]),
        (status = 404, description = "Farm not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn farm_harvests(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<Harvest>> {
    debug!("Getting harvests of farm: {}", id);

    let harvests = state
        .registry
        .harvests_of_farm(id)
        .await
        .map_err(registry_error)?;

    Ok(Json(harvests.into_iter().map(Harvest::from).collect()))
}

/// Get a farm with its harvests
#[utoipa::path(
    get,
    path = "/api/v1/farms/{id}/complete",
    params(
        ("id" = i32, Path, description = "Farm ID")
    ),
    responses(
        (status = 200, description = "Farm with harvests", body = FarmComplete),
        (status = 404, description = "Farm not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "farms"
)]
pub async fn farm_complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<FarmComplete> {
    let complete = state
        .registry
        .farm_complete(id)
        .await
        .map_err(registry_error)?;

    Ok(Json(complete.into()))
}
