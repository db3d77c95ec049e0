use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_inventory_tables::Migration),
            Box::new(m20251101_000002_create_supply_usages_table::Migration),
            Box::new(m20251102_000003_create_maintenance_records_table::Migration),
            Box::new(m20251102_000004_add_maintenance_columns_to_items::Migration),
        ]
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    Name,
    Personnel,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Conditions {
    Table,
    Id,
    Label,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Fullname,
    FirstName,
    LastName,
    Email,
    LocationId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Unit,
    Description,
    Pac,
    UnitValue,
    DateAcquired,
    PoNumber,
    Quantity,
    Status,
    CategoryId,
    LocationId,
    ConditionId,
    UserId,
    MaintenanceCount,
    LifespanEstimate,
    RemainingYears,
    CreatedAt,
    UpdatedAt,
}

fn pk(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

mod m20250101_000001_create_inventory_tables {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(pk(Categories::Id))
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(timestamp(Categories::CreatedAt))
                        .col(timestamp(Categories::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(pk(Locations::Id))
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(ColumnDef::new(Locations::Personnel).string().null())
                        .col(timestamp(Locations::CreatedAt))
                        .col(timestamp(Locations::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Conditions::Table)
                        .if_not_exists()
                        .col(pk(Conditions::Id))
                        .col(ColumnDef::new(Conditions::Label).string().not_null())
                        .col(timestamp(Conditions::CreatedAt))
                        .col(timestamp(Conditions::UpdatedAt))
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(pk(Users::Id))
                        .col(ColumnDef::new(Users::Fullname).string().null())
                        .col(ColumnDef::new(Users::FirstName).string().null())
                        .col(ColumnDef::new(Users::LastName).string().null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::LocationId).integer().null())
                        .col(timestamp(Users::CreatedAt))
                        .col(timestamp(Users::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_users_location_id")
                                .from(Users::Table, Users::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(pk(Items::Id))
                        .col(ColumnDef::new(Items::Unit).string().not_null())
                        .col(ColumnDef::new(Items::Description).string().null())
                        .col(ColumnDef::new(Items::Pac).string().null())
                        .col(
                            ColumnDef::new(Items::UnitValue)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::DateAcquired).date().null())
                        .col(ColumnDef::new(Items::PoNumber).string().null())
                        .col(
                            ColumnDef::new(Items::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Items::Status).string().null())
                        .col(ColumnDef::new(Items::CategoryId).integer().null())
                        .col(ColumnDef::new(Items::LocationId).integer().null())
                        .col(ColumnDef::new(Items::ConditionId).integer().null())
                        .col(ColumnDef::new(Items::UserId).integer().null())
                        .col(timestamp(Items::CreatedAt))
                        .col(timestamp(Items::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_category_id")
                                .from(Items::Table, Items::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_location_id")
                                .from(Items::Table, Items::LocationId)
                                .to(Locations::Table, Locations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_condition_id")
                                .from(Items::Table, Items::ConditionId)
                                .to(Conditions::Table, Conditions::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_user_id")
                                .from(Items::Table, Items::UserId)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_category_id")
                        .table(Items::Table)
                        .col(Items::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_items_location_id")
                        .table(Items::Table)
                        .col(Items::LocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Conditions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }
}

mod m20251101_000002_create_supply_usages_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251101_000002_create_supply_usages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SupplyUsages::Table)
                        .if_not_exists()
                        .col(pk(SupplyUsages::Id))
                        .col(ColumnDef::new(SupplyUsages::ItemId).integer().not_null())
                        .col(ColumnDef::new(SupplyUsages::Period).string().not_null())
                        .col(
                            ColumnDef::new(SupplyUsages::Usage)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SupplyUsages::StockStart).integer().null())
                        .col(ColumnDef::new(SupplyUsages::StockEnd).integer().null())
                        .col(
                            ColumnDef::new(SupplyUsages::Restocked)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SupplyUsages::RestockQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(timestamp(SupplyUsages::CreatedAt))
                        .col(timestamp(SupplyUsages::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supply_usages_item_id")
                                .from(SupplyUsages::Table, SupplyUsages::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Lookup index only; repeated periods per item are allowed
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_supply_usages_item_id_period")
                        .table(SupplyUsages::Table)
                        .col(SupplyUsages::ItemId)
                        .col(SupplyUsages::Period)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplyUsages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SupplyUsages {
        Table,
        Id,
        ItemId,
        Period,
        Usage,
        StockStart,
        StockEnd,
        Restocked,
        RestockQty,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20251102_000003_create_maintenance_records_table {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251102_000003_create_maintenance_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceRecords::Table)
                        .if_not_exists()
                        .col(pk(MaintenanceRecords::Id))
                        .col(
                            ColumnDef::new(MaintenanceRecords::ItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::MaintenanceDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::Reason)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::ConditionBeforeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::ConditionAfterId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::TechnicianNotes)
                                .text()
                                .null(),
                        )
                        .col(timestamp(MaintenanceRecords::CreatedAt))
                        .col(timestamp(MaintenanceRecords::UpdatedAt))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_maintenance_records_item_id")
                                .from(MaintenanceRecords::Table, MaintenanceRecords::ItemId)
                                .to(Items::Table, Items::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_maintenance_records_condition_before_id")
                                .from(
                                    MaintenanceRecords::Table,
                                    MaintenanceRecords::ConditionBeforeId,
                                )
                                .to(Conditions::Table, Conditions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_maintenance_records_condition_after_id")
                                .from(
                                    MaintenanceRecords::Table,
                                    MaintenanceRecords::ConditionAfterId,
                                )
                                .to(Conditions::Table, Conditions::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_maintenance_records_item_id")
                        .table(MaintenanceRecords::Table)
                        .col(MaintenanceRecords::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MaintenanceRecords {
        Table,
        Id,
        ItemId,
        MaintenanceDate,
        Reason,
        ConditionBeforeId,
        ConditionAfterId,
        TechnicianNotes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20251102_000004_add_maintenance_columns_to_items {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20251102_000004_add_maintenance_columns_to_items"
        }
    }

    // SQLite accepts a single change per ALTER TABLE statement
    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .alter_table(
                    Table::alter()
                        .table(Items::Table)
                        .add_column(
                            ColumnDef::new(Items::MaintenanceCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;
            manager
                .alter_table(
                    Table::alter()
                        .table(Items::Table)
                        .add_column(ColumnDef::new(Items::LifespanEstimate).double().null())
                        .to_owned(),
                )
                .await?;
            manager
                .alter_table(
                    Table::alter()
                        .table(Items::Table)
                        .add_column(ColumnDef::new(Items::RemainingYears).double().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for column in [
                Items::RemainingYears,
                Items::LifespanEstimate,
                Items::MaintenanceCount,
            ] {
                manager
                    .alter_table(
                        Table::alter()
                            .table(Items::Table)
                            .drop_column(column)
                            .to_owned(),
                    )
                    .await?;
            }
            Ok(())
        }
    }
}
