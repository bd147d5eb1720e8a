//! Registry persistence adapter
//!
//! [`RegistryStore`] is the seam the registry service is written against.
//! [`SeaOrmStore`] implements it for any SeaORM connection, including an
//! open [`DatabaseTransaction`], which is how multi-step writes get a real
//! transaction.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use thiserror::Error;

use crate::entities::{farm, harvest, producer};

/// Errors raised by the persistence adapter
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

/// Fields for a new producer row. `cpf` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewProducer {
    pub cpf: String,
    pub name: String,
}

/// Partial producer update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct ProducerChanges {
    pub cpf: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFarm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub total_area: f64,
    pub arable_area: f64,
    pub producer_id: Option<i32>,
}

/// Partial farm update. Setting `producer_id` links the farm to that producer.
#[derive(Debug, Clone, Default)]
pub struct FarmChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub total_area: Option<f64>,
    pub arable_area: Option<f64>,
    pub producer_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewHarvest {
    pub year: i32,
    pub crop: String,
    pub farm_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct HarvestChanges {
    pub year: Option<i32>,
    pub crop: Option<String>,
    pub farm_id: Option<i32>,
}

/// Number of farms in one state
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct StateCount {
    pub state: String,
    pub count: i64,
}

/// Number of harvest records for one crop
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct CropCount {
    pub crop: String,
    pub count: i64,
}

/// Number of harvest records for one year
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

/// Summed farm areas in hectares
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AreaTotals {
    pub total_area: f64,
    pub arable_area: f64,
}

#[derive(Debug, FromQueryResult)]
struct AreaSums {
    total_area: Option<f64>,
    arable_area: Option<f64>,
}

/// Persistence operations needed by the registry
#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn list_producers(&self) -> Result<Vec<producer::Model>, StoreError>;
    async fn find_producer(&self, id: i32) -> Result<Option<producer::Model>, StoreError>;
    async fn find_producer_by_cpf(
        &self,
        cpf: &str,
    ) -> Result<Option<producer::Model>, StoreError>;
    async fn insert_producer(&self, new: NewProducer) -> Result<producer::Model, StoreError>;
    /// Returns `None` when no producer has this id
    async fn update_producer(
        &self,
        id: i32,
        changes: ProducerChanges,
    ) -> Result<Option<producer::Model>, StoreError>;
    /// Returns whether a row was removed
    async fn delete_producer(&self, id: i32) -> Result<bool, StoreError>;

    async fn list_farms(&self) -> Result<Vec<farm::Model>, StoreError>;
    async fn find_farm(&self, id: i32) -> Result<Option<farm::Model>, StoreError>;
    async fn farms_of_producer(&self, producer_id: i32) -> Result<Vec<farm::Model>, StoreError>;
    /// First farm named `name` owned by `producer_id`
    async fn find_farm_by_name(
        &self,
        producer_id: i32,
        name: &str,
    ) -> Result<Option<farm::Model>, StoreError>;
    async fn insert_farm(&self, new: NewFarm) -> Result<farm::Model, StoreError>;
    async fn update_farm(
        &self,
        id: i32,
        changes: FarmChanges,
    ) -> Result<Option<farm::Model>, StoreError>;
    async fn delete_farm(&self, id: i32) -> Result<bool, StoreError>;

    async fn list_harvests(&self) -> Result<Vec<harvest::Model>, StoreError>;
    async fn find_harvest(&self, id: i32) -> Result<Option<harvest::Model>, StoreError>;
    async fn harvests_of_farm(&self, farm_id: i32) -> Result<Vec<harvest::Model>, StoreError>;
    async fn harvests_of_year(&self, year: i32) -> Result<Vec<harvest::Model>, StoreError>;
    async fn insert_harvest(&self, new: NewHarvest) -> Result<harvest::Model, StoreError>;
    async fn update_harvest(
        &self,
        id: i32,
        changes: HarvestChanges,
    ) -> Result<Option<harvest::Model>, StoreError>;
    async fn delete_harvest(&self, id: i32) -> Result<bool, StoreError>;
    /// Returns the number of harvests removed
    async fn delete_harvests_of_farm(&self, farm_id: i32) -> Result<u64, StoreError>;

    async fn count_farms(&self) -> Result<u64, StoreError>;
    async fn count_harvests(&self) -> Result<u64, StoreError>;
    /// Ordered by count descending, then state
    async fn farms_by_state(&self) -> Result<Vec<StateCount>, StoreError>;
    /// Ordered by count descending, then crop
    async fn crops_by_name(&self) -> Result<Vec<CropCount>, StoreError>;
    /// Ordered by year descending
    async fn harvests_by_year(&self) -> Result<Vec<YearCount>, StoreError>;
    async fn area_totals(&self) -> Result<AreaTotals, StoreError>;

    /// Open a transaction scoped store, or `None` if this store has no
    /// transaction support.
    async fn begin(&self) -> Result<Option<SeaOrmStore<DatabaseTransaction>>, StoreError> {
        Ok(None)
    }
}

/// SeaORM-backed [`RegistryStore`]
#[derive(Debug, Clone)]
pub struct SeaOrmStore<C = DatabaseConnection> {
    conn: C,
}

impl<C> SeaOrmStore<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }
}

impl SeaOrmStore<DatabaseTransaction> {
    pub async fn commit(self) -> Result<(), StoreError> {
        self.conn.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), StoreError> {
        self.conn.rollback().await?;
        Ok(())
    }
}

#[async_trait]
impl<C> RegistryStore for SeaOrmStore<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_producers(&self) -> Result<Vec<producer::Model>, StoreError> {
        Ok(producer::Entity::find()
            .order_by_asc(producer::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn find_producer(&self, id: i32) -> Result<Option<producer::Model>, StoreError> {
        Ok(producer::Entity::find_by_id(id).one(&self.conn).await?)
    }

    async fn find_producer_by_cpf(
        &self,
        cpf: &str,
    ) -> Result<Option<producer::Model>, StoreError> {
        Ok(producer::Entity::find()
            .filter(producer::Column::Cpf.eq(cpf))
            .one(&self.conn)
            .await?)
    }

    async fn insert_producer(&self, new: NewProducer) -> Result<producer::Model, StoreError> {
        let model = producer::ActiveModel {
            cpf: Set(new.cpf),
            name: Set(new.name),
            ..Default::default()
        };

        Ok(model.insert(&self.conn).await?)
    }

    async fn update_producer(
        &self,
        id: i32,
        changes: ProducerChanges,
    ) -> Result<Option<producer::Model>, StoreError> {
        let Some(found) = producer::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: producer::ActiveModel = found.clone().into();
        if let Some(cpf) = changes.cpf {
            active.cpf = Set(cpf);
        }
        if let Some(name) = changes.name {
            active.name = Set(name);
        }

        if !active.is_changed() {
            return Ok(Some(found));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    async fn delete_producer(&self, id: i32) -> Result<bool, StoreError> {
        let result = producer::Entity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_farms(&self) -> Result<Vec<farm::Model>, StoreError> {
        Ok(farm::Entity::find()
            .order_by_asc(farm::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn find_farm(&self, id: i32) -> Result<Option<farm::Model>, StoreError> {
        Ok(farm::Entity::find_by_id(id).one(&self.conn).await?)
    }

    async fn farms_of_producer(&self, producer_id: i32) -> Result<Vec<farm::Model>, StoreError> {
        Ok(farm::Entity::find()
            .filter(farm::Column::ProducerId.eq(producer_id))
            .order_by_asc(farm::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn find_farm_by_name(
        &self,
        producer_id: i32,
        name: &str,
    ) -> Result<Option<farm::Model>, StoreError> {
        Ok(farm::Entity::find()
            .filter(farm::Column::ProducerId.eq(producer_id))
            .filter(farm::Column::Name.eq(name))
            .order_by_asc(farm::Column::Id)
            .one(&self.conn)
            .await?)
    }

    async fn insert_farm(&self, new: NewFarm) -> Result<farm::Model, StoreError> {
        let model = farm::ActiveModel {
            name: Set(new.name),
            city: Set(new.city),
            state: Set(new.state),
            total_area: Set(new.total_area),
            arable_area: Set(new.arable_area),
            producer_id: Set(new.producer_id),
            ..Default::default()
        };

        Ok(model.insert(&self.conn).await?)
    }

    async fn update_farm(
        &self,
        id: i32,
        changes: FarmChanges,
    ) -> Result<Option<farm::Model>, StoreError> {
        let Some(found) = farm::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: farm::ActiveModel = found.clone().into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(city) = changes.city {
            active.city = Set(city);
        }
        if let Some(state) = changes.state {
            active.state = Set(state);
        }
        if let Some(total_area) = changes.total_area {
            active.total_area = Set(total_area);
        }
        if let Some(arable_area) = changes.arable_area {
            active.arable_area = Set(arable_area);
        }
        if let Some(producer_id) = changes.producer_id {
            active.producer_id = Set(Some(producer_id));
        }

        if !active.is_changed() {
            return Ok(Some(found));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    async fn delete_farm(&self, id: i32) -> Result<bool, StoreError> {
        let result = farm::Entity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_harvests(&self) -> Result<Vec<harvest::Model>, StoreError> {
        Ok(harvest::Entity::find()
            .order_by_asc(harvest::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn find_harvest(&self, id: i32) -> Result<Option<harvest::Model>, StoreError> {
        Ok(harvest::Entity::find_by_id(id).one(&self.conn).await?)
    }

    async fn harvests_of_farm(&self, farm_id: i32) -> Result<Vec<harvest::Model>, StoreError> {
        Ok(harvest::Entity::find()
            .filter(harvest::Column::FarmId.eq(farm_id))
            .order_by_asc(harvest::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn harvests_of_year(&self, year: i32) -> Result<Vec<harvest::Model>, StoreError> {
        Ok(harvest::Entity::find()
            .filter(harvest::Column::Year.eq(year))
            .order_by_asc(harvest::Column::Id)
            .all(&self.conn)
            .await?)
    }

    async fn insert_harvest(&self, new: NewHarvest) -> Result<harvest::Model, StoreError> {
        let model = harvest::ActiveModel {
            year: Set(new.year),
            crop: Set(new.crop),
            farm_id: Set(new.farm_id),
            ..Default::default()
        };

        Ok(model.insert(&self.conn).await?)
    }

    async fn update_harvest(
        &self,
        id: i32,
        changes: HarvestChanges,
    ) -> Result<Option<harvest::Model>, StoreError> {
        let Some(found) = harvest::Entity::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: harvest::ActiveModel = found.clone().into();
        if let Some(year) = changes.year {
            active.year = Set(year);
        }
        if let Some(crop) = changes.crop {
            active.crop = Set(crop);
        }
        if let Some(farm_id) = changes.farm_id {
            active.farm_id = Set(farm_id);
        }

        if !active.is_changed() {
            return Ok(Some(found));
        }

        Ok(Some(active.update(&self.conn).await?))
    }

    async fn delete_harvest(&self, id: i32) -> Result<bool, StoreError> {
        let result = harvest::Entity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_harvests_of_farm(&self, farm_id: i32) -> Result<u64, StoreError> {
        let result = harvest::Entity::delete_many()
            .filter(harvest::Column::FarmId.eq(farm_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    async fn count_farms(&self) -> Result<u64, StoreError> {
        Ok(farm::Entity::find().count(&self.conn).await?)
    }

    async fn count_harvests(&self) -> Result<u64, StoreError> {
        Ok(harvest::Entity::find().count(&self.conn).await?)
    }

    async fn farms_by_state(&self) -> Result<Vec<StateCount>, StoreError> {
        Ok(farm::Entity::find()
            .select_only()
            .column(farm::Column::State)
            .column_as(Expr::col(farm::Column::Id).count(), "count")
            .group_by(farm::Column::State)
            .order_by_desc(Expr::col(farm::Column::Id).count())
            .order_by_asc(farm::Column::State)
            .into_model::<StateCount>()
            .all(&self.conn)
            .await?)
    }

    async fn crops_by_name(&self) -> Result<Vec<CropCount>, StoreError> {
        Ok(harvest::Entity::find()
            .select_only()
            .column(harvest::Column::Crop)
            .column_as(Expr::col(harvest::Column::Id).count(), "count")
            .group_by(harvest::Column::Crop)
            .order_by_desc(Expr::col(harvest::Column::Id).count())
            .order_by_asc(harvest::Column::Crop)
            .into_model::<CropCount>()
            .all(&self.conn)
            .await?)
    }

    async fn harvests_by_year(&self) -> Result<Vec<YearCount>, StoreError> {
        Ok(harvest::Entity::find()
            .select_only()
            .column(harvest::Column::Year)
            .column_as(Expr::col(harvest::Column::Id).count(), "count")
            .group_by(harvest::Column::Year)
            .order_by_desc(harvest::Column::Year)
            .into_model::<YearCount>()
            .all(&self.conn)
            .await?)
    }

    async fn area_totals(&self) -> Result<AreaTotals, StoreError> {
        let sums = farm::Entity::find()
            .select_only()
            .column_as(Expr::col(farm::Column::TotalArea).sum(), "total_area")
            .column_as(Expr::col(farm::Column::ArableArea).sum(), "arable_area")
            .into_model::<AreaSums>()
            .one(&self.conn)
            .await?;

        // SUM over an empty table is NULL
        Ok(sums
            .map(|s| AreaTotals {
                total_area: s.total_area.unwrap_or(0.0),
                arable_area: s.arable_area.unwrap_or(0.0),
            })
            .unwrap_or_default())
    }

    async fn begin(&self) -> Result<Option<SeaOrmStore<DatabaseTransaction>>, StoreError> {
        let txn = self.conn.begin().await?;
        Ok(Some(SeaOrmStore::new(txn)))
    }
}
