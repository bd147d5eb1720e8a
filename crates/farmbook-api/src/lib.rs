pub mod error;
pub mod handlers;
pub mod models;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use farmbook_registry::RegistryService;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
pub struct AppState {
    pub registry: Arc<RegistryService>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Farmbook API",
        version = "0.1.0",
        description = "REST API for the registry of rural producers, their farms and harvests",
        contact(
            name = "Farmbook Team",
            email = "team@farmbook.dev"
        )
    ),
    paths(
        handlers::system::health_check,
        handlers::producers::list_producers,
        handlers::producers::producer_list,
        handlers::producers::get_producer,
        handlers::producers::create_producer,
        handlers::producers::update_producer,
        handlers::producers::delete_producer,
        handlers::producers::producer_complete,
        handlers::farms::list_farms,
        handlers::farms::farm_list,
        handlers::farms::get_farm,
        handlers::farms::create_farm,
        handlers::farms::update_farm,
        handlers::farms::delete_farm,
        handlers::farms::farm_harvests,
        handlers::farms::farm_complete,
        handlers::harvests::list_harvests,
        handlers::harvests::get_harvest,
        handlers::harvests::harvests_of_year,
        handlers::harvests::create_harvest,
        handlers::harvests::update_harvest,
        handlers::harvests::delete_harvest,
        handlers::registry::create_complete_data,
        handlers::registry::link_farm_producer,
        handlers::registry::link_producer_farm,
        handlers::stats::farm_state_stats,
        handlers::stats::area_stats,
        handlers::stats::farm_summary,
        handlers::stats::crop_stats,
        handlers::stats::harvest_year_stats,
    ),
    components(
        schemas(
            models::Envelope,
            models::ErrorResponse,
            models::HealthResponse,
            models::Producer,
            models::CreateProducerRequest,
            models::UpdateProducerRequest,
            models::ProducerComplete,
            models::Farm,
            models::FarmListItem,
            models::CreateFarmRequest,
            models::UpdateFarmRequest,
            models::FarmComplete,
            models::Harvest,
            models::CreateHarvestRequest,
            models::UpdateHarvestRequest,
            models::FarmDraft,
            models::HarvestDraft,
            models::CompleteDataRequest,
            models::LinkRequest,
            models::StateCount,
            models::FarmStateStats,
            models::CropCount,
            models::CropStats,
            models::YearCount,
            models::AreaStats,
            models::FarmSummary,
        )
    ),
    tags(
        (name = "producers", description = "Producer management endpoints"),
        (name = "farms", description = "Farm management endpoints"),
        (name = "harvests", description = "Harvest management endpoints"),
        (name = "registry", description = "Bulk registration and linking endpoints"),
        (name = "stats", description = "Aggregate statistics endpoints"),
        (name = "system", description = "System health and info endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// Allowed CORS origins (if None, allows all)
    pub cors_origins: Option<Vec<String>>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            enable_cors: true,
            cors_origins: None,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, registry: Arc<RegistryService>) -> Self {
        let state = Arc::new(AppState { registry });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        use handlers::{farms, harvests, producers, registry, stats, system};

        let api_doc = ApiDoc::openapi();

        let api_router = Router::new()
            .route("/api/v1/health", get(system::health_check))
            // Producers
            .route(
                "/api/v1/producers",
                get(producers::list_producers).post(producers::create_producer),
            )
            .route("/api/v1/producers/list", get(producers::producer_list))
            .route(
                "/api/v1/producers/{id}",
                get(producers::get_producer)
                    .put(producers::update_producer)
                    .delete(producers::delete_producer),
            )
            .route(
                "/api/v1/producers/{id}/complete",
                get(producers::producer_complete),
            )
            // Farms
            .route(
                "/api/v1/farms",
                get(farms::list_farms).post(farms::create_farm),
            )
            .route("/api/v1/farms/list", get(farms::farm_list))
            .route("/api/v1/farms/stats", get(stats::farm_state_stats))
            .route("/api/v1/farms/area-stats", get(stats::area_stats))
            .route("/api/v1/farms/summary", get(stats::farm_summary))
            .route(
                "/api/v1/farms/{id}",
                get(farms::get_farm)
                    .put(farms::update_farm)
                    .delete(farms::delete_farm),
            )
            .route("/api/v1/farms/{id}/harvests", get(farms::farm_harvests))
            .route("/api/v1/farms/{id}/complete", get(farms::farm_complete))
            // Harvests
            .route(
                "/api/v1/harvests",
                get(harvests::list_harvests).post(harvests::create_harvest),
            )
            .route("/api/v1/harvests/crop-stats", get(stats::crop_stats))
            .route(
                "/api/v1/harvests/year-stats",
                get(stats::harvest_year_stats),
            )
            .route(
                "/api/v1/harvests/year/{year}",
                get(harvests::harvests_of_year),
            )
            .route(
                "/api/v1/harvests/{id}",
                get(harvests::get_harvest)
                    .put(harvests::update_harvest)
                    .delete(harvests::delete_harvest),
            )
            // Bulk registration and linking
            .route(
                "/api/v1/complete-data",
                post(registry::create_complete_data),
            )
            .route(
                "/api/v1/link-farm-producer",
                post(registry::link_farm_producer),
            )
            .route(
                "/api/v1/link-producer-farm",
                post(registry::link_producer_farm),
            )
            .with_state(self.state.clone());

        // SwaggerUi automatically creates a route for /api/openapi.json
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router);

        let mut router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(self.cors_layer());
        }

        router
    }

    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        match &self.config.cors_origins {
            Some(origins) => {
                let origins: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|origin| match HeaderValue::from_str(origin) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            warn!("Ignoring invalid CORS origin: {}", origin);
                            None
                        }
                    })
                    .collect();
                layer.allow_origin(AllowOrigin::list(origins))
            }
            None => layer.allow_origin(Any),
        }
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );
        info!("Swagger UI: http://{}/swagger-ui", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
