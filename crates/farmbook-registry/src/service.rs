//! Registry service: CRUD with existence checks, cascade delete and linking

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use farmbook_db::entities::{farm, harvest, producer};
use farmbook_db::{
    FarmChanges, HarvestChanges, NewFarm, NewHarvest, NewProducer, ProducerChanges,
    RegistryStore,
};
use tracing::{debug, info};

use crate::cpf::normalize_cpf;
use crate::error::{RegistryError, Result};

pub(crate) const DUPLICATE_CPF: &str = "A producer with this CPF is already registered";

/// How a failed "complete data" registration undoes its partial writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackStrategy {
    /// Run the writes in one store transaction and roll it back on failure.
    /// Falls back to [`RollbackStrategy::Compensate`] if the store cannot
    /// open transactions.
    #[default]
    Transaction,
    /// Write directly and delete the created rows on failure (best effort)
    Compensate,
}

impl fmt::Display for RollbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackStrategy::Transaction => write!(f, "transaction"),
            RollbackStrategy::Compensate => write!(f, "compensate"),
        }
    }
}

impl FromStr for RollbackStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transaction" => Ok(RollbackStrategy::Transaction),
            "compensate" => Ok(RollbackStrategy::Compensate),
            other => Err(format!(
                "unknown rollback strategy '{}' (expected 'transaction' or 'compensate')",
                other
            )),
        }
    }
}

/// A farm together with its harvests
#[derive(Debug, Clone, PartialEq)]
pub struct FarmWithHarvests {
    pub farm: farm::Model,
    pub harvests: Vec<harvest::Model>,
}

/// A producer with every farm it owns, each with its harvests
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerWithFarms {
    pub producer: producer::Model,
    pub farms: Vec<FarmWithHarvests>,
}

/// Rows removed by a producer delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerDeletion {
    pub producer_id: i32,
    pub farms_deleted: u64,
    pub harvests_deleted: u64,
}

/// Rows removed by a farm delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmDeletion {
    pub farm_id: i32,
    pub harvests_deleted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub farm_id: i32,
    pub farm_name: String,
    pub producer_id: i32,
    pub producer_name: String,
}

/// Orchestrates registry operations over a [`RegistryStore`]
pub struct RegistryService {
    pub(crate) store: Arc<dyn RegistryStore>,
    pub(crate) rollback: RollbackStrategy,
}

impl RegistryService {
    pub fn new(store: Arc<dyn RegistryStore>, rollback: RollbackStrategy) -> Self {
        Self { store, rollback }
    }

    pub fn rollback_strategy(&self) -> RollbackStrategy {
        self.rollback
    }

    // ------------------------------------------------------------------
    // Producers
    // ------------------------------------------------------------------

    pub async fn list_producers(&self) -> Result<Vec<producer::Model>> {
        debug!("Listing producers");
        Ok(self.store.list_producers().await?)
    }

    pub async fn get_producer(&self, id: i32) -> Result<producer::Model> {
        self.store
            .find_producer(id)
            .await?
            .ok_or_else(|| producer_not_found(id))
    }

    /// Register a producer. The CPF is normalized and must not be in use.
    pub async fn create_producer(&self, new: NewProducer) -> Result<producer::Model> {
        let cpf = normalize_cpf(&new.cpf)?;

        if self.store.find_producer_by_cpf(&cpf).await?.is_some() {
            return Err(RegistryError::Conflict(DUPLICATE_CPF.to_string()));
        }

        let created = self
            .store
            .insert_producer(NewProducer {
                cpf,
                name: new.name,
            })
            .await?;

        info!("Created producer {} ({})", created.id, created.cpf);
        Ok(created)
    }

    /// Partially update a producer. A new CPF may only collide with the
    /// producer's own current CPF.
    pub async fn update_producer(
        &self,
        id: i32,
        changes: ProducerChanges,
    ) -> Result<producer::Model> {
        self.get_producer(id).await?;

        let cpf = match changes.cpf {
            Some(raw) => {
                let cpf = normalize_cpf(&raw)?;
                if let Some(holder) = self.store.find_producer_by_cpf(&cpf).await? {
                    if holder.id != id {
                        return Err(RegistryError::Conflict(DUPLICATE_CPF.to_string()));
                    }
                }
                Some(cpf)
            }
            None => None,
        };

        let updated = self
            .store
            .update_producer(
                id,
                ProducerChanges {
                    cpf,
                    name: changes.name,
                },
            )
            .await?
            .ok_or_else(|| producer_not_found(id))?;

        info!("Updated producer {}", id);
        Ok(updated)
    }

    /// Delete a producer together with its farms and their harvests.
    ///
    /// Not atomic: a store failure midway leaves the rows deleted so far.
    pub async fn delete_producer(&self, id: i32) -> Result<ProducerDeletion> {
        self.get_producer(id).await?;

        let farms = self.store.farms_of_producer(id).await?;
        let mut farms_deleted = 0;
        let mut harvests_deleted = 0;

        for farm in farms {
            harvests_deleted += self.store.delete_harvests_of_farm(farm.id).await?;
            if self.store.delete_farm(farm.id).await? {
                farms_deleted += 1;
            }
        }

        if !self.store.delete_producer(id).await? {
            return Err(producer_not_found(id));
        }

        info!(
            "Deleted producer {} with {} farm(s) and {} harvest(s)",
            id, farms_deleted, harvests_deleted
        );

        Ok(ProducerDeletion {
            producer_id: id,
            farms_deleted,
            harvests_deleted,
        })
    }

    pub async fn producer_complete(&self, id: i32) -> Result<ProducerWithFarms> {
        let producer = self.get_producer(id).await?;

        let mut farms = Vec::new();
        for farm in self.store.farms_of_producer(id).await? {
            let harvests = self.store.harvests_of_farm(farm.id).await?;
            farms.push(FarmWithHarvests { farm, harvests });
        }

        Ok(ProducerWithFarms { producer, farms })
    }

    // ------------------------------------------------------------------
    // Farms
    // ------------------------------------------------------------------

    pub async fn list_farms(&self) -> Result<Vec<farm::Model>> {
        debug!("Listing farms");
        Ok(self.store.list_farms().await?)
    }

    pub async fn get_farm(&self, id: i32) -> Result<farm::Model> {
        self.store
            .find_farm(id)
            .await?
            .ok_or_else(|| farm_not_found(id))
    }

    /// Create a farm, optionally owned by an existing producer
    pub async fn create_farm(&self, new: NewFarm) -> Result<farm::Model> {
        if let Some(producer_id) = new.producer_id {
            self.require_producer(producer_id).await?;
        }

        let created = self.store.insert_farm(new).await?;

        info!("Created farm {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update_farm(&self, id: i32, changes: FarmChanges) -> Result<farm::Model> {
        self.get_farm(id).await?;

        if let Some(producer_id) = changes.producer_id {
            self.require_producer(producer_id).await?;
        }

        let updated = self
            .store
            .update_farm(id, changes)
            .await?
            .ok_or_else(|| farm_not_found(id))?;

        info!("Updated farm {}", id);
        Ok(updated)
    }

    /// Delete a farm and its harvests. Not atomic.
    pub async fn delete_farm(&self, id: i32) -> Result<FarmDeletion> {
        self.get_farm(id).await?;

        let harvests_deleted = self.store.delete_harvests_of_farm(id).await?;

        if !self.store.delete_farm(id).await? {
            return Err(farm_not_found(id));
        }

        info!("Deleted farm {} with {} harvest(s)", id, harvests_deleted);

        Ok(FarmDeletion {
            farm_id: id,
            harvests_deleted,
        })
    }

    pub async fn harvests_of_farm(&self, farm_id: i32) -> Result<Vec<harvest::Model>> {
        self.get_farm(farm_id).await?;
        Ok(self.store.harvests_of_farm(farm_id).await?)
    }

    pub async fn farm_complete(&self, id: i32) -> Result<FarmWithHarvests> {
        let farm = self.get_farm(id).await?;
        let harvests = self.store.harvests_of_farm(id).await?;

        Ok(FarmWithHarvests { farm, harvests })
    }

    /// Make `producer_id` the owner of `farm_id`. Both must exist; nothing is
    /// written otherwise.
    pub async fn link_farm_to_producer(&self, farm_id: i32, producer_id: i32) -> Result<LinkOutcome> {
        let farm = self.store.find_farm(farm_id).await?.ok_or_else(|| {
            RegistryError::MissingReference(format!("Farm with id {} not found", farm_id))
        })?;
        let producer = self.require_producer(producer_id).await?;

        self.store
            .update_farm(
                farm_id,
                FarmChanges {
                    producer_id: Some(producer_id),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| farm_not_found(farm_id))?;

        info!("Linked farm {} to producer {}", farm_id, producer_id);

        Ok(LinkOutcome {
            farm_id,
            farm_name: farm.name,
            producer_id,
            producer_name: producer.name,
        })
    }

    // ------------------------------------------------------------------
    // Harvests
    // ------------------------------------------------------------------

    pub async fn list_harvests(&self) -> Result<Vec<harvest::Model>> {
        debug!("Listing harvests");
        Ok(self.store.list_harvests().await?)
    }

    pub async fn get_harvest(&self, id: i32) -> Result<harvest::Model> {
        self.store
            .find_harvest(id)
            .await?
            .ok_or_else(|| harvest_not_found(id))
    }

    pub async fn harvests_of_year(&self, year: i32) -> Result<Vec<harvest::Model>> {
        Ok(self.store.harvests_of_year(year).await?)
    }

    /// Record a harvest on an existing farm
    pub async fn create_harvest(&self, new: NewHarvest) -> Result<harvest::Model> {
        self.require_farm(new.farm_id).await?;

        let created = self.store.insert_harvest(new).await?;

        info!(
            "Created harvest {} ({} {}) on farm {}",
            created.id, created.crop, created.year, created.farm_id
        );
        Ok(created)
    }

    pub async fn update_harvest(&self, id: i32, changes: HarvestChanges) -> Result<harvest::Model> {
        self.get_harvest(id).await?;

        if let Some(farm_id) = changes.farm_id {
            self.require_farm(farm_id).await?;
        }

        let updated = self
            .store
            .update_harvest(id, changes)
            .await?
            .ok_or_else(|| harvest_not_found(id))?;

        info!("Updated harvest {}", id);
        Ok(updated)
    }

    pub async fn delete_harvest(&self, id: i32) -> Result<()> {
        if !self.store.delete_harvest(id).await? {
            return Err(harvest_not_found(id));
        }

        info!("Deleted harvest {}", id);
        Ok(())
    }

    async fn require_producer(&self, id: i32) -> Result<producer::Model> {
        self.store.find_producer(id).await?.ok_or_else(|| {
            RegistryError::MissingReference(format!("Producer with id {} not found", id))
        })
    }

    async fn require_farm(&self, id: i32) -> Result<farm::Model> {
        self.store.find_farm(id).await?.ok_or_else(|| {
            RegistryError::MissingReference(format!("Farm with id {} not found", id))
        })
    }
}

fn producer_not_found(id: i32) -> RegistryError {
    RegistryError::NotFound(format!("Producer {} not found", id))
}

fn farm_not_found(id: i32) -> RegistryError {
    RegistryError::NotFound(format!("Farm {} not found", id))
}

fn harvest_not_found(id: i32) -> RegistryError {
    RegistryError::NotFound(format!("Harvest {} not found", id))
}
