use farmbook_db::entities::{farm, harvest, producer};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform envelope returned by mutating endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Operation-specific payload
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl Envelope {
    pub fn ok(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

// ============================================================
// Producers
// ============================================================

/// Registered producer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Producer {
    pub id: i32,
    /// CPF in `DDD.DDD.DDD-DD` form
    #[schema(example = "285.487.490-08")]
    pub cpf: String,
    #[schema(example = "Marcos Fernando de Souza")]
    pub name: String,
}

impl From<producer::Model> for Producer {
    fn from(model: producer::Model) -> Self {
        Self {
            id: model.id,
            cpf: model.cpf,
            name: model.name,
        }
    }
}

/// Request to register a producer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProducerRequest {
    /// CPF with or without punctuation; must contain 11 digits
    #[schema(example = "28548749008")]
    pub cpf: String,
    pub name: String,
}

/// Partial producer update
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProducerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Producer with its farms and their harvests
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProducerComplete {
    pub id: i32,
    pub cpf: String,
    pub name: String,
    pub farms: Vec<FarmComplete>,
}

impl From<farmbook_registry::ProducerWithFarms> for ProducerComplete {
    fn from(value: farmbook_registry::ProducerWithFarms) -> Self {
        Self {
            id: value.producer.id,
            cpf: value.producer.cpf,
            name: value.producer.name,
            farms: value.farms.into_iter().map(FarmComplete::from).collect(),
        }
    }
}

// ============================================================
// Farms
// ============================================================

/// Farm with its derived vegetation area
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Farm {
    pub id: i32,
    #[schema(example = "Fazenda Nova")]
    pub name: String,
    pub city: String,
    /// Region/state code
    #[schema(example = "SP")]
    pub state: String,
    /// Total area in hectares
    pub total_area: f64,
    /// Arable area in hectares
    pub arable_area: f64,
    /// `total_area - arable_area`, may be negative
    pub vegetation_area: f64,
    /// Owning producer, if linked
    pub producer_id: Option<i32>,
}

impl From<farm::Model> for Farm {
    fn from(model: farm::Model) -> Self {
        Self {
            vegetation_area: model.vegetation_area(),
            id: model.id,
            name: model.name,
            city: model.city,
            state: model.state,
            total_area: model.total_area,
            arable_area: model.arable_area,
            producer_id: model.producer_id,
        }
    }
}

/// Minimal farm listing entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmListItem {
    pub id: i32,
    pub name: String,
}

/// Request to create a farm
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateFarmRequest {
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
    /// Existing producer to own the farm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<i32>,
}

/// Partial farm update
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateFarmRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arable_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<i32>,
}

/// Farm with its harvests
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmComplete {
    #[serde(flatten)]
    pub farm: Farm,
    pub harvests: Vec<Harvest>,
}

impl From<farmbook_registry::FarmWithHarvests> for FarmComplete {
    fn from(value: farmbook_registry::FarmWithHarvests) -> Self {
        Self {
            farm: value.farm.into(),
            harvests: value.harvests.into_iter().map(Harvest::from).collect(),
        }
    }
}

// ============================================================
// Harvests
// ============================================================

/// Crop-year record of a farm
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Harvest {
    pub id: i32,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = "Soja")]
    pub crop: String,
    pub farm_id: i32,
}

impl From<harvest::Model> for Harvest {
    fn from(model: harvest::Model) -> Self {
        Self {
            id: model.id,
            year: model.year,
            crop: model.crop,
            farm_id: model.farm_id,
        }
    }
}

/// Request to record a harvest
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateHarvestRequest {
    pub year: i32,
    pub crop: String,
    pub farm_id: i32,
}

/// Partial harvest update
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateHarvestRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<i32>,
}

// ============================================================
// Bulk registration and linking
// ============================================================

/// Farm entry of a complete-data registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
}

/// Harvest entry of a complete-data registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HarvestDraft {
    pub year: i32,
    pub crop: String,
    /// Name of a farm listed in the same request
    pub farm_name: String,
}

/// Producer with farms and harvests registered in one request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteDataRequest {
    pub producer: CreateProducerRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farms: Option<Vec<FarmDraft>>,
    /// Only allowed together with `farms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harvests: Option<Vec<HarvestDraft>>,
}

impl From<CompleteDataRequest> for farmbook_registry::CompleteDataRequest {
    fn from(request: CompleteDataRequest) -> Self {
        Self {
            producer: farmbook_db::NewProducer {
                cpf: request.producer.cpf,
                name: request.producer.name,
            },
            farms: request
                .farms
                .unwrap_or_default()
                .into_iter()
                .map(|f| farmbook_registry::FarmDraft {
                    name: f.name,
                    city: f.city,
                    state: f.state,
                    total_area: f.total_area,
                    arable_area: f.arable_area,
                })
                .collect(),
            harvests: request
                .harvests
                .unwrap_or_default()
                .into_iter()
                .map(|h| farmbook_registry::HarvestDraft {
                    year: h.year,
                    crop: h.crop,
                    farm_name: h.farm_name,
                })
                .collect(),
        }
    }
}

/// Farm/producer pair to link
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LinkRequest {
    pub farm_id: i32,
    pub producer_id: i32,
}

// ============================================================
// Statistics
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StateCount {
    pub state: String,
    pub count: i64,
}

/// Farms grouped by state, most populated first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmStateStats {
    pub total_farms: u64,
    pub by_state: Vec<StateCount>,
}

impl From<farmbook_registry::FarmStateStats> for FarmStateStats {
    fn from(stats: farmbook_registry::FarmStateStats) -> Self {
        Self {
            total_farms: stats.total_farms,
            by_state: stats
                .by_state
                .into_iter()
                .map(|s| StateCount {
                    state: s.state,
                    count: s.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CropCount {
    pub crop: String,
    pub count: i64,
}

/// Harvest records grouped by crop, most frequent first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CropStats {
    /// Number of harvest records
    pub total_harvests: u64,
    pub crops: Vec<CropCount>,
}

impl From<farmbook_registry::CropStats> for CropStats {
    fn from(stats: farmbook_registry::CropStats) -> Self {
        Self {
            total_harvests: stats.total_harvests,
            crops: stats
                .crops
                .into_iter()
                .map(|c| CropCount {
                    crop: c.crop,
                    count: c.count,
                })
                .collect(),
        }
    }
}

/// Harvest records of one year
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

impl From<farmbook_db::YearCount> for YearCount {
    fn from(row: farmbook_db::YearCount) -> Self {
        Self {
            year: row.year,
            count: row.count,
        }
    }
}

/// Area totals in hectares
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AreaStats {
    pub total_area: f64,
    pub arable_area: f64,
    /// `total_area - arable_area`, not clamped
    pub vegetation_area: f64,
}

impl From<farmbook_registry::AreaStats> for AreaStats {
    fn from(stats: farmbook_registry::AreaStats) -> Self {
        Self {
            total_area: stats.total_area,
            arable_area: stats.arable_area,
            vegetation_area: stats.vegetation_area,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FarmSummary {
    pub total_farms: u64,
    pub total_area: f64,
}

impl From<farmbook_registry::FarmSummary> for FarmSummary {
    fn from(summary: farmbook_registry::FarmSummary) -> Self {
        Self {
            total_farms: summary.total_farms,
            total_area: summary.total_area,
        }
    }
}
