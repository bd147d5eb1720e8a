//! Aggregate reads. These always answer 200; an unavailable store yields
//! zeroed figures.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::*;
use crate::AppState;

/// Farms grouped by state
#[utoipa::path(
    get,
    path = "/api/v1/farms/stats",
    responses(
        (status = 200, description = "Farm count per state", body = FarmStateStats)
    ),
    tag = "stats"
)]
pub async fn farm_state_stats(State(state): State<Arc<AppState>>) -> Json<FarmStateStats> {
    Json(state.registry.farm_state_stats().await.into())
}

/// Summed farm areas
#[utoipa::path(
    get,
    path = "/api/v1/farms/area-stats",
    responses(
        (status = 200, description = "Total, arable and vegetation area", body = AreaStats)
    ),
    tag = "stats"
)]
pub async fn area_stats(State(state): State<Arc<AppState>>) -> Json<AreaStats> {
    Json(state.registry.area_stats().await.into())
}

/// Farm count and total area
#[utoipa::path(
    get,
    path = "/api/v1/farms/summary",
    responses(
        (status = 200, description = "Farm summary", body = FarmSummary)
    ),
    tag = "stats"
)]
pub async fn farm_summary(State(state): State<Arc<AppState>>) -> Json<FarmSummary> {
    Json(state.registry.farm_summary().await.into())
}

/// Harvest records grouped by crop
#[utoipa::path(
    get,
    path = "/api/v1/harvests/crop-stats",
    responses(
        (status = 200, description = "Harvest count per crop", body = CropStats)
    ),
    tag = "stats"
)]
pub async fn crop_stats(State(state): State<Arc<AppState>>) -> Json<CropStats> {
    Json(state.registry.crop_stats().await.into())
}

/// Harvest records grouped by year, newest first
#[utoipa::path(
    get,
    path = "/api/v1/harvests/year-stats",
    responses(
        (status = 200, description = "Harvest count per year", body = [YearCount])
    ),
    tag = "stats"
)]
pub async fn harvest_year_stats(State(state): State<Arc<AppState>>) -> Json<Vec<YearCount>> {
    let years = state.registry.harvest_year_stats().await;

    Json(years.into_iter().map(YearCount::from).collect())
}
