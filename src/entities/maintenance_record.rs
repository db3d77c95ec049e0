use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Why an item was serviced
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MaintenanceReason {
    #[sea_orm(string_value = "Wet")]
    Wet,
    #[sea_orm(string_value = "Overheat")]
    Overheat,
    #[sea_orm(string_value = "Wear")]
    Wear,
    #[sea_orm(string_value = "Electrical")]
    Electrical,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "maintenance_records")]
#[schema(as = MaintenanceRecord)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub maintenance_date: NaiveDate,
    pub reason: MaintenanceReason,
    pub condition_before_id: i32,
    pub condition_after_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub technician_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_delete = "Cascade"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::condition::Entity",
        from = "Column::ConditionBeforeId",
        to = "super::condition::Column::Id",
        on_delete = "Cascade"
    )]
    ConditionBefore,
    #[sea_orm(
        belongs_to = "super::condition::Entity",
        from = "Column::ConditionAfterId",
        to = "super::condition::Column::Id",
        on_delete = "Cascade"
    )]
    ConditionAfter,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();
        if insert {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
