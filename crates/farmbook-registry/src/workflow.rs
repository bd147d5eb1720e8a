//! Bulk "complete data" registration
//!
//! Registers a producer together with its farms and harvests in one call.
//! Harvests point at their farm by name, resolved against the farms of the
//! same request. A failure after the first write undoes the writes made so
//! far, see [`RollbackStrategy`].

use std::collections::HashMap;

use farmbook_db::{NewFarm, NewHarvest, NewProducer, RegistryStore};
use tracing::{debug, info, warn};

use crate::cpf::normalize_cpf;
use crate::error::{RegistryError, Result};
use crate::service::{RegistryService, RollbackStrategy, DUPLICATE_CPF};

/// Farm fields for bulk registration; the owner is the new producer
#[derive(Debug, Clone)]
pub struct FarmDraft {
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
}

/// Harvest fields for bulk registration, naming its farm
#[derive(Debug, Clone)]
pub struct HarvestDraft {
    pub year: i32,
    pub crop: String,
    pub farm_name: String,
}

#[derive(Debug, Clone)]
pub struct CompleteDataRequest {
    pub producer: NewProducer,
    pub farms: Vec<FarmDraft>,
    pub harvests: Vec<HarvestDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteDataOutcome {
    pub producer_id: i32,
    /// Every farm the request resolved to, in request order, without repeats
    pub farm_ids: Vec<i32>,
    pub harvest_ids: Vec<i32>,
}

/// Rows created so far, deleted in reverse dependency order on failure
#[derive(Debug, Default)]
struct Journal {
    producer: Option<i32>,
    farms: Vec<i32>,
    harvests: Vec<i32>,
}

impl RegistryService {
    /// Register a producer with its farms and harvests.
    ///
    /// Validation and the CPF uniqueness check happen before any write.
    pub async fn create_complete_data(
        &self,
        request: CompleteDataRequest,
    ) -> Result<CompleteDataOutcome> {
        if !request.harvests.is_empty() && request.farms.is_empty() {
            return Err(RegistryError::Validation(
                "Harvests can only be registered together with farms".to_string(),
            ));
        }

        let cpf = normalize_cpf(&request.producer.cpf)?;
        if self.store.find_producer_by_cpf(&cpf).await?.is_some() {
            return Err(RegistryError::Conflict(DUPLICATE_CPF.to_string()));
        }

        if self.rollback == RollbackStrategy::Transaction {
            if let Some(txn) = self.store.begin().await? {
                return match write_complete_data(&txn, cpf, &request, None).await {
                    Ok(outcome) => {
                        txn.commit().await?;
                        log_outcome(&outcome);
                        Ok(outcome)
                    }
                    Err(err) => {
                        warn!("Complete data registration failed, rolling back: {}", err);
                        if let Err(rollback_err) = txn.rollback().await {
                            warn!("Transaction rollback failed: {}", rollback_err);
                        }
                        Err(err)
                    }
                };
            }
            debug!("Store cannot open transactions, using compensating deletes");
        }

        let mut journal = Journal::default();
        let written =
            write_complete_data(self.store.as_ref(), cpf, &request, Some(&mut journal)).await;
        match written {
            Ok(outcome) => {
                log_outcome(&outcome);
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    "Complete data registration failed, deleting created rows: {}",
                    err
                );
                self.compensate(journal).await;
                Err(err)
            }
        }
    }

    /// Best-effort undo. Failures are logged and skipped so the caller still
    /// gets the original error.
    async fn compensate(&self, journal: Journal) {
        for id in journal.harvests.iter().rev() {
            if let Err(e) = self.store.delete_harvest(*id).await {
                warn!("Rollback could not delete harvest {}: {}", id, e);
            }
        }

        for id in journal.farms.iter().rev() {
            if let Err(e) = self.store.delete_farm(*id).await {
                warn!("Rollback could not delete farm {}: {}", id, e);
            }
        }

        if let Some(id) = journal.producer {
            if let Err(e) = self.store.delete_producer(id).await {
                warn!("Rollback could not delete producer {}: {}", id, e);
            }
        }
    }
}

/// `journal` records created rows for compensating deletes; a transaction
/// passes `None`.
async fn write_complete_data(
    store: &dyn RegistryStore,
    cpf: String,
    request: &CompleteDataRequest,
    mut journal: Option<&mut Journal>,
) -> Result<CompleteDataOutcome> {
    let producer = store
        .insert_producer(NewProducer {
            cpf,
            name: request.producer.name.clone(),
        })
        .await?;
    if let Some(journal) = journal.as_deref_mut() {
        journal.producer = Some(producer.id);
    }

    let mut farms_by_name: HashMap<&str, i32> = HashMap::new();
    let mut farm_ids = Vec::new();

    for draft in &request.farms {
        let farm_id = match store.find_farm_by_name(producer.id, &draft.name).await? {
            Some(existing) => {
                debug!("Reusing farm {} for '{}'", existing.id, draft.name);
                existing.id
            }
            None => {
                let created = store
                    .insert_farm(NewFarm {
                        name: draft.name.clone(),
                        city: draft.city.clone(),
                        state: draft.state.clone(),
                        total_area: draft.total_area,
                        arable_area: draft.arable_area,
                        producer_id: Some(producer.id),
                    })
                    .await?;
                if let Some(journal) = journal.as_deref_mut() {
                    journal.farms.push(created.id);
                }
                created.id
            }
        };

        farms_by_name.insert(draft.name.as_str(), farm_id);
        if !farm_ids.contains(&farm_id) {
            farm_ids.push(farm_id);
        }
    }

    let mut harvest_ids = Vec::new();

    for draft in &request.harvests {
        let farm_id = *farms_by_name
            .get(draft.farm_name.as_str())
            .ok_or_else(|| {
                RegistryError::MissingReference(format!(
                    "Farm '{}' is not part of this registration",
                    draft.farm_name
                ))
            })?;

        let created = store
            .insert_harvest(NewHarvest {
                year: draft.year,
                crop: draft.crop.clone(),
                farm_id,
            })
            .await?;
        if let Some(journal) = journal.as_deref_mut() {
            journal.harvests.push(created.id);
        }
        harvest_ids.push(created.id);
    }

    Ok(CompleteDataOutcome {
        producer_id: producer.id,
        farm_ids,
        harvest_ids,
    })
}

fn log_outcome(outcome: &CompleteDataOutcome) {
    info!(
        "Registered producer {} with {} farm(s) and {} harvest(s)",
        outcome.producer_id,
        outcome.farm_ids.len(),
        outcome.harvest_ids.len()
    );
}
