use crate::{
    entities::{
        condition,
        item::{self, Entity as Item},
        maintenance_record::{self, Entity as MaintenanceRecord, MaintenanceReason},
    },
    errors::ServiceError,
    services::ensure_exists,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RecordMaintenanceInput {
    pub maintenance_date: NaiveDate,
    pub reason: MaintenanceReason,
    pub condition_before_id: i32,
    pub condition_after_id: i32,
    #[validate(length(max = 5000))]
    pub technician_notes: Option<String>,
}

/// A stored maintenance record with the item's count after the increment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MaintenanceRecorded {
    #[serde(flatten)]
    pub record: maintenance_record::Model,
    pub maintenance_count: i32,
}

#[derive(Clone)]
pub struct MaintenanceService {
    db: Arc<DatabaseConnection>,
}

impl MaintenanceService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records for `item_id`, newest maintenance date first
    #[instrument(skip(self))]
    pub async fn list_for_item(
        &self,
        item_id: i32,
    ) -> Result<Vec<maintenance_record::Model>, ServiceError> {
        ensure_exists::<Item, _>(&*self.db, item_id, "Item").await?;

        let records = MaintenanceRecord::find()
            .filter(maintenance_record::Column::ItemId.eq(item_id))
            .order_by_desc(maintenance_record::Column::MaintenanceDate)
            .order_by_desc(maintenance_record::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(records)
    }

    /// Inserts the record and bumps the item's `maintenance_count` by one in
    /// a single transaction.
    #[instrument(skip(self, input))]
    pub async fn record(
        &self,
        item_id: i32,
        input: RecordMaintenanceInput,
    ) -> Result<MaintenanceRecorded, ServiceError> {
        let txn = self.db.begin().await?;

        ensure_exists::<Item, _>(&txn, item_id, "Item").await?;
        ensure_exists::<condition::Entity, _>(&txn, input.condition_before_id, "Condition").await?;
        ensure_exists::<condition::Entity, _>(&txn, input.condition_after_id, "Condition").await?;

        let record = maintenance_record::ActiveModel {
            item_id: Set(item_id),
            maintenance_date: Set(input.maintenance_date),
            reason: Set(input.reason),
            condition_before_id: Set(input.condition_before_id),
            condition_after_id: Set(input.condition_after_id),
            technician_notes: Set(input.technician_notes),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        Item::update_many()
            .col_expr(
                item::Column::MaintenanceCount,
                Expr::col(item::Column::MaintenanceCount).add(1),
            )
            .col_expr(item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(item::Column::Id.eq(item_id))
            .exec(&txn)
            .await?;

        let maintenance_count = Item::find_by_id(item_id)
            .one(&txn)
            .await?
            .map(|item| item.maintenance_count)
            .ok_or_else(|| ServiceError::not_found("Item", item_id))?;

        txn.commit().await?;

        info!(
            item_id,
            record_id = record.id,
            maintenance_count,
            reason = ?record.reason,
            "Maintenance recorded"
        );
        Ok(MaintenanceRecorded {
            record,
            maintenance_count,
        })
    }
}
