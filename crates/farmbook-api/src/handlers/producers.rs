use axum::{
    extract::{Path, State},
    Json,
};
use farmbook_db::{NewProducer, ProducerChanges};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{registry_error, ApiResult};
use crate::models::*;
use crate::AppState;

/// List all producers
#[utoipa::path(
    get,
    path = "/api/v1/producers",
    responses(
        (status = 200, description = "List of producers", body = [Producer]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn list_producers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Producer>> {
    let producers = state
        .registry
        .list_producers()
        .await
        .map_err(registry_error)?;

    Ok(Json(producers.into_iter().map(Producer::from).collect()))
}

/// Compact producer listing
#[utoipa::path(
    get,
    path = "/api/v1/producers/list",
    responses(
        (status = 200, description = "Producer id, CPF and name", body = [Producer]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn producer_list(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Producer>> {
    list_producers(State(state)).await
}

/// Get a producer by ID
#[utoipa::path(
    get,
    path = "/api/v1/producers/{id}",
    params(
        ("id" = i32, Path, description = "Producer ID")
    ),
    responses(
        (status = 200, description = "Producer", body = Producer),
        (status = 404, description = "Producer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn get_producer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Producer> {
    debug!("Getting producer: {}", id);

    let producer = state.registry.get_producer(id).await.map_err(registry_error)?;

    Ok(Json(producer.into()))
}

/// Register a producer
#[utoipa::path(
    post,
    path = "/api/v1/producers",
    request_body = CreateProducerRequest,
    responses(
        (status = 200, description = "Producer created", body = Envelope),
        (status = 400, description = "Invalid or duplicate CPF", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn create_producer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProducerRequest>,
) -> ApiResult<Envelope> {
    info!("Creating producer: {}", req.name);

    let created = state
        .registry
        .create_producer(NewProducer {
            cpf: req.cpf,
            name: req.name,
        })
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Producer created successfully",
        json!(Producer::from(created)),
    )))
}

/// Update a producer
#[utoipa::path(
    put,
    path = "/api/v1/producers/{id}",
    params(
        ("id" = i32, Path, description = "Producer ID")
    ),
    request_body = UpdateProducerRequest,
    responses(
        (status = 200, description = "Producer updated", body = Envelope),
        (status = 400, description = "Invalid or duplicate CPF", body = ErrorResponse),
        (status = 404, description = "Producer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn update_producer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProducerRequest>,
) -> ApiResult<Envelope> {
    info!("Updating producer: {}", id);

    let updated = state
        .registry
        .update_producer(
            id,
            ProducerChanges {
                cpf: req.cpf,
                name: req.name,
            },
        )
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Producer updated successfully",
        json!(Producer::from(updated)),
    )))
}

/// Delete a producer with its farms and harvests
#[utoipa::path(
    delete,
    path = "/api/v1/producers/{id}",
    params(
        ("id" = i32, Path, description = "Producer ID")
    ),
    responses(
        (status = 200, description = "Producer deleted, with counts of removed farms and harvests", body = Envelope),
        (status = 404, description = "Producer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn delete_producer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Envelope> {
    info!("Deleting producer: {}", id);

    let deletion = state
        .registry
        .delete_producer(id)
        .await
        .map_err(registry_error)?;

    Ok(Json(Envelope::ok(
        "Producer deleted successfully",
        json!({
            "producer_id": deletion.producer_id,
            "farms_deleted": deletion.farms_deleted,
            "harvests_deleted": deletion.harvests_deleted,
        }),
    )))
}

/// Get a producer with its farms and harvests
#[utoipa::path(
    get,
    path = "/api/v1/producers/{id}/complete",
    params(
        ("id" = i32, Path, description = "Producer ID")
    ),
    responses(
        (status = 200, description = "Producer with farms and harvests", body = ProducerComplete),
        (status = 404, description = "Producer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "producers"
)]
pub async fn producer_complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<ProducerComplete> {
    debug!("Getting complete producer: {}", id);

    let complete = state
        .registry
        .producer_complete(id)
        .await
        .map_err(registry_error)?;

    Ok(Json(complete.into()))
}
