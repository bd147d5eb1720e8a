//! Bulk registration and farm/producer linking

use axum::{extract::State, Json};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::error::{registry_error, ApiResult};
use crate::models::*;
use crate::AppState;

/// Register a producer together with farms and harvests
///
/// When any write fails, the writes already made are undone.
#[utoipa::path(
    post,
    path = "/api/v1/complete-data",
    request_body = CompleteDataRequest,
    responses(
        (status = 200, description = "Producer, farms and harvests created", body = Envelope),
        (status = 400, description = "Invalid input, duplicate CPF or unknown farm name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "registry"
)]
pub async fn create_complete_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompleteDataRequest>,
) -> ApiResult<Envelope> {
    info!("Registering complete data for producer: {}", req.producer.name);

    let outcome = state
        .registry
        .create_complete_data(req.into())
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Complete data registered successfully",
        json!({
            "producer_id": outcome.producer_id,
            "farm_ids": outcome.farm_ids,
            "harvest_ids": outcome.harvest_ids,
        }),
    )))
}

/// Link a farm to a producer
#[utoipa::path(
    post,
    path = "/api/v1/link-farm-producer",
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Farm linked", body = Envelope),
        (status = 400, description = "Farm or producer does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "registry"
)]
pub async fn link_farm_producer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LinkRequest>,
) -> ApiResult<Envelope> {
    link(&state, req).await
}

/// Link a producer to a farm (same effect as `link-farm-producer`)
#[utoipa::path(
    post,
    path = "/api/v1/link-producer-farm",
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Farm linked", body = Envelope),
        (status = 400, description = "Farm or producer does not exist", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "registry"
)]
pub async fn link_producer_farm(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LinkRequest>,
) -> ApiResult<Envelope> {
    link(&state, req).await
}

async fn link(state: &AppState, req: LinkRequest) -> ApiResult<Envelope> {
    let outcome = state
        .registry
        .link_farm_to_producer(req.farm_id, req.producer_id)
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        format!(
            "Farm '{}' linked to producer '{}'",
            outcome.farm_name, outcome.producer_name
        ),
        json!({
            "farm_id": outcome.farm_id,
            "farm_name": outcome.farm_name,
            "producer_id": outcome.producer_id,
            "producer_name": outcome.producer_name,
        }),
    )))
}
