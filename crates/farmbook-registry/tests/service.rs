//! Registry service behaviour against a real SQLite in-memory database

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use farmbook_db::entities::{farm as farms, harvest as harvests, producer as producers};
use farmbook_db::{
    connect, migrate, AreaTotals, CropCount, DbErr, FarmChanges, HarvestChanges, NewFarm,
    NewHarvest, NewProducer, ProducerChanges, RegistryStore, SeaOrmStore, StateCount, StoreError,
    YearCount,
};
use farmbook_registry::{
    CompleteDataRequest, FarmDraft, HarvestDraft, RegistryError, RegistryService,
    RollbackStrategy,
};

async fn setup_store() -> Arc<SeaOrmStore> {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    migrate(&db).await.expect("Failed to run migrations");

    Arc::new(SeaOrmStore::new(db))
}

async fn setup_service(rollback: RollbackStrategy) -> (RegistryService, Arc<SeaOrmStore>) {
    let store = setup_store().await;
    let service = RegistryService::new(store.clone(), rollback);
    (service, store)
}

fn producer(cpf: &str, name: &str) -> NewProducer {
    NewProducer {
        cpf: cpf.to_string(),
        name: name.to_string(),
    }
}

fn farm(name: &str, state: &str, total: f64, arable: f64, producer_id: Option<i32>) -> NewFarm {
    NewFarm {
        name: name.to_string(),
        city: "Uberaba".to_string(),
        state: state.to_string(),
        total_area: total,
        arable_area: arable,
        producer_id,
    }
}

fn farm_draft(name: &str) -> FarmDraft {
    FarmDraft {
        name: name.to_string(),
        city: "Sorriso".to_string(),
        state: "MT".to_string(),
        total_area: 120.0,
        arable_area: 90.0,
    }
}

fn harvest_draft(year: i32, crop: &str, farm_name: &str) -> HarvestDraft {
    HarvestDraft {
        year,
        crop: crop.to_string(),
        farm_name: farm_name.to_string(),
    }
}

#[tokio::test]
async fn test_create_producer_normalizes_cpf() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let created = service
        .create_producer(producer("12345678900", "Jane"))
        .await
        .unwrap();

    assert_eq!(created.cpf, "123.456.789-00");
}

#[tokio::test]
async fn test_create_producer_rejects_malformed_cpf() {
    let (service, store) = setup_service(RollbackStrategy::Transaction).await;

    let err = service
        .create_producer(producer("123.456", "Jane"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Validation(_)));
    assert!(store.list_producers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_cpf_creates_no_row() {
    let (service, store) = setup_service(RollbackStrategy::Transaction).await;

    service
        .create_producer(producer("123.456.789-00", "Jane"))
        .await
        .unwrap();

    // Same digits, different punctuation
    let err = service
        .create_producer(producer("12345678900", "John"))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Conflict(_)));
    assert_eq!(
        err.to_string(),
        "A producer with this CPF is already registered"
    );
    assert_eq!(store.list_producers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_producer_cpf_uniqueness_excludes_self() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let jane = service
        .create_producer(producer("111.111.111-11", "Jane"))
        .await
        .unwrap();
    service
        .create_producer(producer("222.222.222-22", "John"))
        .await
        .unwrap();

    // Re-submitting its own CPF is fine
    let updated = service
        .update_producer(
            jane.id,
            ProducerChanges {
                cpf: Some("11111111111".to_string()),
                name: Some("Jane Doe".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Jane Doe");

    let err = service
        .update_producer(
            jane.id,
            ProducerChanges {
                cpf: Some("222.222.222-22".to_string()),
                name: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Conflict(_)));
}

#[tokio::test]
async fn test_update_missing_producer_is_not_found() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let err = service
        .update_producer(99, ProducerChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_producer_cascades() {
    let (service, store) = setup_service(RollbackStrategy::Transaction).await;

    let owner = service
        .create_producer(producer("123.456.789-00", "Jane"))
        .await
        .unwrap();
    let bystander = service
        .create_producer(producer("987.654.321-00", "John"))
        .await
        .unwrap();

    let f1 = service
        .create_farm(farm("North", "SP", 100.0, 80.0, Some(owner.id)))
        .await
        .unwrap();
    let f2 = service
        .create_farm(farm("South", "PR", 40.0, 20.0, Some(owner.id)))
        .await
        .unwrap();
    let kept = service
        .create_farm(farm("Other", "PR", 10.0, 5.0, Some(bystander.id)))
        .await
        .unwrap();

    let mut harvest_ids = Vec::new();
    for (farm_id, crop) in [(f1.id, "Soja"), (f1.id, "Milho"), (f2.id, "Café")] {
        let h = service
            .create_harvest(NewHarvest {
                year: 2024,
                crop: crop.to_string(),
                farm_id,
            })
            .await
            .unwrap();
        harvest_ids.push(h.id);
    }
    service
        .create_harvest(NewHarvest {
            year: 2024,
            crop: "Soja".to_string(),
            farm_id: kept.id,
        })
        .await
        .unwrap();

    let deletion = service.delete_producer(owner.id).await.unwrap();
    assert_eq!(deletion.producer_id, owner.id);
    assert_eq!(deletion.farms_deleted, 2);
    assert_eq!(deletion.harvests_deleted, 3);

    assert!(matches!(
        service.get_producer(owner.id).await,
        Err(RegistryError::NotFound(_))
    ));
    for id in [f1.id, f2.id] {
        assert!(matches!(
            service.get_farm(id).await,
            Err(RegistryError::NotFound(_))
        ));
    }
    for id in harvest_ids {
        assert!(matches!(
            service.get_harvest(id).await,
            Err(RegistryError::NotFound(_))
        ));
    }

    // Unrelated rows survive
    assert!(store.find_farm(kept.id).await.unwrap().is_some());
    assert_eq!(store.list_harvests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_farm_cascades_to_harvests() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let f = service
        .create_farm(farm("Lone", "BA", 10.0, 5.0, None))
        .await
        .unwrap();
    for year in [2022, 2023] {
        service
            .create_harvest(NewHarvest {
                year,
                crop: "Algodão".to_string(),
                farm_id: f.id,
            })
            .await
            .unwrap();
    }

    let deletion = service.delete_farm(f.id).await.unwrap();
    assert_eq!(deletion.harvests_deleted, 2);
    assert!(service.list_harvests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_farm_with_unknown_producer_fails() {
    let (service, store) = setup_service(RollbackStrategy::Transaction).await;

    let err = service
        .create_farm(farm("Ghost", "SP", 1.0, 1.0, Some(7)))
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::MissingReference(_)));
    assert!(store.list_farms().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_harvest_requires_farm() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let err = service
        .create_harvest(NewHarvest {
            year: 2024,
            crop: "Soja".to_string(),
            farm_id: 5,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::MissingReference(_)));
    assert_eq!(err.to_string(), "Farm with id 5 not found");
}

#[tokio::test]
async fn test_link_farm_to_producer() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let p = service
        .create_producer(producer("123.456.789-00", "Jane"))
        .await
        .unwrap();
    let f = service
        .create_farm(farm("Unlinked", "GO", 20.0, 10.0, None))
        .await
        .unwrap();

    let link = service.link_farm_to_producer(f.id, p.id).await.unwrap();
    assert_eq!(link.farm_name, "Unlinked");
    assert_eq!(link.producer_name, "Jane");

    let complete = service.producer_complete(p.id).await.unwrap();
    assert_eq!(complete.farms.len(), 1);
    assert_eq!(complete.farms[0].farm.id, f.id);
}

#[tokio::test]
async fn test_link_with_missing_side_mutates_nothing() {
    let (service, store) = setup_service(RollbackStrategy::Transaction).await;

    let p = service
        .create_producer(producer("123.456.789-00", "Jane"))
        .await
        .unwrap();
    let f = service
        .create_farm(farm("Unlinked", "GO", 20.0, 10.0, None))
        .await
        .unwrap();

    let err = service.link_farm_to_producer(f.id, 999).await.unwrap_err();
    assert!(matches!(err, RegistryError::MissingReference(_)));
    assert_eq!(err.to_string(), "Producer with id 999 not found");

    let err = service.link_farm_to_producer(999, p.id).await.unwrap_err();
    assert!(matches!(err, RegistryError::MissingReference(_)));
    assert_eq!(err.to_string(), "Farm with id 999 not found");

    let unchanged = store.find_farm(f.id).await.unwrap().unwrap();
    assert_eq!(unchanged.producer_id, None);
}

#[tokio::test]
async fn test_update_farm_checks_new_owner() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let f = service
        .create_farm(farm("Field", "RS", 20.0, 10.0, None))
        .await
        .unwrap();

    let err = service
        .update_farm(
            f.id,
            FarmChanges {
                producer_id: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::MissingReference(_)));

    let renamed = service
        .update_farm(
            f.id,
            FarmChanges {
                name: Some("Field II".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Field II");
}

#[tokio::test]
async fn test_harvests_of_missing_farm_is_not_found() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let err = service.harvests_of_farm(12).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}

#[tokio::test]
async fn test_complete_data_creates_hierarchy() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let outcome = service
        .create_complete_data(CompleteDataRequest {
            producer: producer("285.487.490-08", "Marcos"),
            farms: vec![farm_draft("Boa Vista"), farm_draft("Esperança")],
            harvests: vec![
                harvest_draft(2024, "Soja", "Boa Vista"),
                harvest_draft(2024, "Milho", "Esperança"),
                harvest_draft(2025, "Soja", "Esperança"),
            ],
        })
        .await
        .unwrap();

    assert_eq!(outcome.farm_ids.len(), 2);
    assert_eq!(outcome.harvest_ids.len(), 3);

    let complete = service.producer_complete(outcome.producer_id).await.unwrap();
    assert_eq!(complete.producer.cpf, "285.487.490-08");
    assert_eq!(complete.farms.len(), 2);
    assert_eq!(complete.farms[0].harvests.len(), 1);
    assert_eq!(complete.farms[1].harvests.len(), 2);
}

#[tokio::test]
async fn test_complete_data_reuses_farm_named_twice() {
    let (service, store) = setup_service(RollbackStrategy::Compensate).await;

    let outcome = service
        .create_complete_data(CompleteDataRequest {
            producer: producer("285.487.490-08", "Marcos"),
            farms: vec![farm_draft("Boa Vista"), farm_draft("Boa Vista")],
            harvests: vec![harvest_draft(2024, "Soja", "Boa Vista")],
        })
        .await
        .unwrap();

    assert_eq!(outcome.farm_ids.len(), 1);
    assert_eq!(store.list_farms().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_complete_data_rejects_harvests_without_farms() {
    let (service, store) = setup_service(RollbackStrategy::Compensate).await;

    let err = service
        .create_complete_data(CompleteDataRequest {
            producer: producer("285.487.490-08", "Marcos"),
            farms: vec![],
            harvests: vec![harvest_draft(2024, "Soja", "Boa Vista")],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Validation(_)));
    assert!(store.list_producers().await.unwrap().is_empty());
    assert!(store.list_farms().await.unwrap().is_empty());
    assert!(store.list_harvests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_data_conflict_has_no_side_effects() {
    let (service, store) = setup_service(RollbackStrategy::Transaction).await;

    service
        .create_producer(producer("285.487.490-08", "Marcos"))
        .await
        .unwrap();

    let err = service
        .create_complete_data(CompleteDataRequest {
            producer: producer("28548749008", "Someone Else"),
            farms: vec![farm_draft("Boa Vista")],
            harvests: vec![],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Conflict(_)));
    assert_eq!(store.list_producers().await.unwrap().len(), 1);
    assert!(store.list_farms().await.unwrap().is_empty());
}

async fn assert_failed_registration_leaves_nothing(rollback: RollbackStrategy) {
    let (service, store) = setup_service(rollback).await;

    // An unrelated farm that must survive the rollback
    let existing = store
        .insert_farm(farm("Boa Vista", "SP", 5.0, 5.0, None))
        .await
        .unwrap();

    let err = service
        .create_complete_data(CompleteDataRequest {
            producer: producer("285.487.490-08", "Marcos"),
            farms: vec![farm_draft("Boa Vista"), farm_draft("Esperança")],
            harvests: vec![
                harvest_draft(2024, "Soja", "Boa Vista"),
                harvest_draft(2024, "Milho", "Nowhere"),
            ],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::MissingReference(_)));
    assert!(store.list_producers().await.unwrap().is_empty());
    assert!(store.list_harvests().await.unwrap().is_empty());

    let farms = store.list_farms().await.unwrap();
    assert_eq!(farms.len(), 1);
    assert_eq!(farms[0].id, existing.id);
}

#[tokio::test]
async fn test_failed_registration_rolls_back_transaction() {
    assert_failed_registration_leaves_nothing(RollbackStrategy::Transaction).await;
}

#[tokio::test]
async fn test_failed_registration_compensates() {
    assert_failed_registration_leaves_nothing(RollbackStrategy::Compensate).await;
}

#[tokio::test]
async fn test_area_stats_vegetation_is_difference() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    service
        .create_farm(farm("A", "SP", 100.0, 80.0, None))
        .await
        .unwrap();
    // Arable larger than total: vegetation goes negative, not clamped
    service
        .create_farm(farm("B", "MG", 10.0, 40.0, None))
        .await
        .unwrap();

    let stats = service.area_stats().await;
    assert_eq!(stats.total_area, 110.0);
    assert_eq!(stats.arable_area, 120.0);
    assert_eq!(stats.vegetation_area, -10.0);
    assert_eq!(stats.vegetation_area, stats.total_area - stats.arable_area);

    let summary = service.farm_summary().await;
    assert_eq!(summary.total_farms, 2);
    assert_eq!(summary.total_area, 110.0);
}

#[tokio::test]
async fn test_state_and_crop_stats() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let sp = service
        .create_farm(farm("A", "SP", 1.0, 1.0, None))
        .await
        .unwrap();
    service
        .create_farm(farm("B", "SP", 1.0, 1.0, None))
        .await
        .unwrap();
    service
        .create_farm(farm("C", "GO", 1.0, 1.0, None))
        .await
        .unwrap();
    for (year, crop) in [(2023, "Milho"), (2024, "Soja"), (2024, "Soja")] {
        service
            .create_harvest(NewHarvest {
                year,
                crop: crop.to_string(),
                farm_id: sp.id,
            })
            .await
            .unwrap();
    }

    let states = service.farm_state_stats().await;
    assert_eq!(states.total_farms, 3);
    assert_eq!(states.by_state[0].state, "SP");
    assert_eq!(states.by_state[0].count, 2);

    let crops = service.crop_stats().await;
    assert_eq!(crops.total_harvests, 3);
    assert_eq!(crops.crops[0].crop, "Soja");
    assert_eq!(crops.crops[0].count, 2);

    let years = service.harvest_year_stats().await;
    assert_eq!(years[0].year, 2024);
    assert_eq!(years[1].year, 2023);
}

#[tokio::test]
async fn test_stats_degrade_when_store_is_unusable() {
    // No migrations: every aggregate query fails
    let db = connect("sqlite::memory:").await.unwrap();
    let service = RegistryService::new(
        Arc::new(SeaOrmStore::new(db)),
        RollbackStrategy::Transaction,
    );

    let states = service.farm_state_stats().await;
    assert_eq!(states.total_farms, 0);
    assert!(states.by_state.is_empty());

    let crops = service.crop_stats().await;
    assert_eq!(crops.total_harvests, 0);
    assert!(crops.crops.is_empty());

    assert!(service.harvest_year_stats().await.is_empty());

    let areas = service.area_stats().await;
    assert_eq!(areas.total_area, 0.0);
    assert_eq!(areas.vegetation_area, 0.0);

    // Writes still surface the failure
    let err = service
        .create_producer(producer("123.456.789-00", "Jane"))
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::Store(_)));
}

/// Passes everything through to SQLite except that the second harvest insert
/// and every farm delete fail.
struct FlakyStore {
    inner: SeaOrmStore,
    harvest_inserts: AtomicUsize,
}

fn injected(what: &str) -> StoreError {
    StoreError::Db(DbErr::Custom(format!("injected {} failure", what)))
}

#[async_trait]
impl RegistryStore for FlakyStore {
    async fn list_producers(&self) -> Result<Vec<producers::Model>, StoreError> {
        self.inner.list_producers().await
    }
    async fn find_producer(&self, id: i32) -> Result<Option<producers::Model>, StoreError> {
        self.inner.find_producer(id).await
    }
    async fn find_producer_by_cpf(
        &self,
        cpf: &str,
    ) -> Result<Option<producers::Model>, StoreError> {
        self.inner.find_producer_by_cpf(cpf).await
    }
    async fn insert_producer(&self, new: NewProducer) -> Result<producers::Model, StoreError> {
        self.inner.insert_producer(new).await
    }
    async fn update_producer(
        &self,
        id: i32,
        changes: ProducerChanges,
    ) -> Result<Option<producers::Model>, StoreError> {
        self.inner.update_producer(id, changes).await
    }
    async fn delete_producer(&self, id: i32) -> Result<bool, StoreError> {
        self.inner.delete_producer(id).await
    }

    async fn list_farms(&self) -> Result<Vec<farms::Model>, StoreError> {
        self.inner.list_farms().await
    }
    async fn find_farm(&self, id: i32) -> Result<Option<farms::Model>, StoreError> {
        self.inner.find_farm(id).await
    }
    async fn farms_of_producer(&self, producer_id: i32) -> Result<Vec<farms::Model>, StoreError> {
        self.inner.farms_of_producer(producer_id).await
    }
    async fn find_farm_by_name(
        &self,
        producer_id: i32,
        name: &str,
    ) -> Result<Option<farms::Model>, StoreError> {
        self.inner.find_farm_by_name(producer_id, name).await
    }
    async fn insert_farm(&self, new: NewFarm) -> Result<farms::Model, StoreError> {
        self.inner.insert_farm(new).await
    }
    async fn update_farm(
        &self,
        id: i32,
        changes: FarmChanges,
    ) -> Result<Option<farms::Model>, StoreError> {
        self.inner.update_farm(id, changes).await
    }
    async fn delete_farm(&self, _id: i32) -> Result<bool, StoreError> {
        Err(injected("farm delete"))
    }

    async fn list_harvests(&self) -> Result<Vec<harvests::Model>, StoreError> {
        self.inner.list_harvests().await
    }
    async fn find_harvest(&self, id: i32) -> Result<Option<harvests::Model>, StoreError> {
        self.inner.find_harvest(id).await
    }
    async fn harvests_of_farm(&self, farm_id: i32) -> Result<Vec<harvests::Model>, StoreError> {
        self.inner.harvests_of_farm(farm_id).await
    }
    async fn harvests_of_year(&self, year: i32) -> Result<Vec<harvests::Model>, StoreError> {
        self.inner.harvests_of_year(year).await
    }
    async fn insert_harvest(&self, new: NewHarvest) -> Result<harvests::Model, StoreError> {
        if self.harvest_inserts.fetch_add(1, Ordering::SeqCst) == 1 {
            return Err(injected("harvest insert"));
        }
        self.inner.insert_harvest(new).await
    }
    async fn update_harvest(
        &self,
        id: i32,
        changes: HarvestChanges,
    ) -> Result<Option<harvests::Model>, StoreError> {
        self.inner.update_harvest(id, changes).await
    }
    async fn delete_harvest(&self, id: i32) -> Result<bool, StoreError> {
        self.inner.delete_harvest(id).await
    }
    async fn delete_harvests_of_farm(&self, farm_id: i32) -> Result<u64, StoreError> {
        self.inner.delete_harvests_of_farm(farm_id).await
    }

    async fn count_farms(&self) -> Result<u64, StoreError> {
        self.inner.count_farms().await
    }
    async fn count_harvests(&self) -> Result<u64, StoreError> {
        self.inner.count_harvests().await
    }
    async fn farms_by_state(&self) -> Result<Vec<StateCount>, StoreError> {
        self.inner.farms_by_state().await
    }
    async fn crops_by_name(&self) -> Result<Vec<CropCount>, StoreError> {
        self.inner.crops_by_name().await
    }
    async fn harvests_by_year(&self) -> Result<Vec<YearCount>, StoreError> {
        self.inner.harvests_by_year().await
    }
    async fn area_totals(&self) -> Result<AreaTotals, StoreError> {
        self.inner.area_totals().await
    }
}

async fn assert_store_failure_is_compensated(rollback: RollbackStrategy) {
    let inner = setup_store().await;
    let flaky = Arc::new(FlakyStore {
        inner: (*inner).clone(),
        harvest_inserts: AtomicUsize::new(0),
    });
    // No `begin` override: the transaction strategy falls back to deletes
    let service = RegistryService::new(flaky, rollback);

    let err = service
        .create_complete_data(CompleteDataRequest {
            producer: producer("285.487.490-08", "Marcos"),
            farms: vec![farm_draft("Boa Vista")],
            harvests: vec![
                harvest_draft(2023, "Soja", "Boa Vista"),
                harvest_draft(2024, "Milho", "Boa Vista"),
            ],
        })
        .await
        .unwrap_err();

    // The insert failure is reported, not the failed cleanup
    assert!(matches!(err, RegistryError::Store(_)));
    assert!(err.to_string().contains("harvest insert"));

    assert!(inner.list_harvests().await.unwrap().is_empty());
    assert!(inner.list_producers().await.unwrap().is_empty());

    // The farm delete failed and was skipped
    assert_eq!(inner.list_farms().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_store_failure_mid_registration_is_compensated() {
    assert_store_failure_is_compensated(RollbackStrategy::Compensate).await;
}

#[tokio::test]
async fn test_store_without_transactions_falls_back_to_compensation() {
    assert_store_failure_is_compensated(RollbackStrategy::Transaction).await;
}

#[tokio::test]
async fn test_update_harvest_to_missing_farm_changes_nothing() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let owner = service
        .create_farm(farm("Boa Vista", "SP", 10.0, 8.0, None))
        .await
        .unwrap();
    let recorded = service
        .create_harvest(NewHarvest {
            year: 2024,
            crop: "Soja".to_string(),
            farm_id: owner.id,
        })
        .await
        .unwrap();

    let err = service
        .update_harvest(
            recorded.id,
            HarvestChanges {
                crop: Some("Milho".to_string()),
                farm_id: Some(999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, RegistryError::MissingReference(ref msg) if msg == "Farm with id 999 not found")
    );
    assert_eq!(service.get_harvest(recorded.id).await.unwrap(), recorded);

    let moved = service
        .update_harvest(
            recorded.id,
            HarvestChanges {
                year: Some(2025),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.year, 2025);
    assert_eq!(moved.farm_id, owner.id);
}

#[tokio::test]
async fn test_delete_harvest_twice_is_not_found() {
    let (service, _) = setup_service(RollbackStrategy::Transaction).await;

    let owner = service
        .create_farm(farm("Boa Vista", "SP", 10.0, 8.0, None))
        .await
        .unwrap();
    let recorded = service
        .create_harvest(NewHarvest {
            year: 2024,
            crop: "Soja".to_string(),
            farm_id: owner.id,
        })
        .await
        .unwrap();

    service.delete_harvest(recorded.id).await.unwrap();

    let err = service.delete_harvest(recorded.id).await.unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(_)));
}
