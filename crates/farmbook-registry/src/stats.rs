//! Aggregate statistics
//!
//! These reads never fail: when the store errors they log a warning and
//! report zero/empty figures instead.

use farmbook_db::{CropCount, StateCount, StoreError, YearCount};
use tracing::warn;

use crate::service::RegistryService;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FarmStateStats {
    pub total_farms: u64,
    pub by_state: Vec<StateCount>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CropStats {
    /// Number of harvest records
    pub total_harvests: u64,
    pub crops: Vec<CropCount>,
}

/// Summed areas in hectares
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AreaStats {
    pub total_area: f64,
    pub arable_area: f64,
    /// `total_area - arable_area`; negative when arable exceeds total
    pub vegetation_area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FarmSummary {
    pub total_farms: u64,
    pub total_area: f64,
}

impl RegistryService {
    pub async fn farm_state_stats(&self) -> FarmStateStats {
        FarmStateStats {
            total_farms: or_default("farm count", self.store.count_farms().await),
            by_state: or_default("farms by state", self.store.farms_by_state().await),
        }
    }

    pub async fn crop_stats(&self) -> CropStats {
        CropStats {
            total_harvests: or_default("harvest count", self.store.count_harvests().await),
            crops: or_default("crops by name", self.store.crops_by_name().await),
        }
    }

    pub async fn harvest_year_stats(&self) -> Vec<YearCount> {
        or_default("harvests by year", self.store.harvests_by_year().await)
    }

    pub async fn area_stats(&self) -> AreaStats {
        let totals = or_default("area totals", self.store.area_totals().await);

        AreaStats {
            total_area: totals.total_area,
            arable_area: totals.arable_area,
            vegetation_area: totals.total_area - totals.arable_area,
        }
    }

    pub async fn farm_summary(&self) -> FarmSummary {
        let total_farms = or_default("farm count", self.store.count_farms().await);
        let totals = or_default("area totals", self.store.area_totals().await);

        FarmSummary {
            total_farms,
            total_area: totals.total_area,
        }
    }
}

fn or_default<T: Default>(what: &str, result: Result<T, StoreError>) -> T {
    result.unwrap_or_else(|e| {
        warn!("Store unavailable for {}, reporting empty result: {}", what, e);
        T::default()
    })
}
