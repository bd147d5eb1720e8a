//! Initial registry schema: producers, farms, harvests

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create producers table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Producer::Table)
                    .if_not_exists()
                    .col(pk_auto(Producer::Id))
                    .col(string_len(Producer::Cpf, 20))
                    .col(string_len(Producer::Name, 100))
                    .to_owned(),
            )
            .await?;

        // Not unique: the registry pre-checks CPF collisions itself
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_producers_cpf")
                    .table(Producer::Table)
                    .col(Producer::Cpf)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create farms table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Farm::Table)
                    .if_not_exists()
                    .col(pk_auto(Farm::Id))
                    .col(string_len(Farm::Name, 100))
                    .col(string_len(Farm::City, 100))
                    .col(string_len(Farm::State, 100))
                    .col(double(Farm::TotalArea))
                    .col(double(Farm::ArableArea))
                    .col(integer_null(Farm::ProducerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farms_producer_id")
                            .from(Farm::Table, Farm::ProducerId)
                            .to(Producer::Table, Producer::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_farms_producer_id")
                    .table(Farm::Table)
                    .col(Farm::ProducerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_farms_state")
                    .table(Farm::Table)
                    .col(Farm::State)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create harvests table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Harvest::Table)
                    .if_not_exists()
                    .col(pk_auto(Harvest::Id))
                    .col(integer(Harvest::Year))
                    .col(string_len(Harvest::Crop, 100))
                    .col(integer(Harvest::FarmId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_harvests_farm_id")
                            .from(Harvest::Table, Harvest::FarmId)
                            .to(Farm::Table, Farm::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_harvests_farm_id")
                    .table(Harvest::Table)
                    .col(Harvest::FarmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_harvests_year")
                    .table(Harvest::Table)
                    .col(Harvest::Year)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Harvest::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Farm::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Producer::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Producer {
    #[sea_orm(iden = "producers")]
    Table,
    Id,
    Cpf,
    Name,
}

#[derive(DeriveIden)]
enum Farm {
    #[sea_orm(iden = "farms")]
    Table,
    Id,
    Name,
    City,
    State,
    TotalArea,
    ArableArea,
    ProducerId,
}

#[derive(DeriveIden)]
enum Harvest {
    #[sea_orm(iden = "harvests")]
    Table,
    Id,
    Year,
    Crop,
    FarmId,
}
