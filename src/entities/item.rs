use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tracked physical asset
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "items")]
#[schema(as = Item)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Article name, e.g. "Desktop Computer"
    pub unit: String,
    pub description: Option<String>,
    /// Property account code
    pub pac: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub unit_value: Decimal,
    pub date_acquired: Option<NaiveDate>,
    pub po_number: Option<String>,
    pub quantity: i32,
    pub status: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub condition_id: Option<i32>,
    pub user_id: Option<i32>,
    /// Incremented only by recording maintenance
    pub maintenance_count: i32,
    /// Predicted total lifespan in years
    pub lifespan_estimate: Option<f64>,
    pub remaining_years: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::condition::Entity",
        from = "Column::ConditionId",
        to = "super::condition::Column::Id",
        on_delete = "SetNull"
    )]
    Condition,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
    #[sea_orm(has_many = "super::maintenance_record::Entity")]
    MaintenanceRecords,
    #[sea_orm(has_many = "super::supply_usage::Entity")]
    SupplyUsages,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::condition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Condition.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::maintenance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceRecords.def()
    }
}

impl Related<super::supply_usage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SupplyUsages.def()
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
            if let ActiveValue::NotSet = active_model.maintenance_count {
                active_model.maintenance_count = Set(0);
            }
            if let ActiveValue::NotSet = active_model.quantity {
                active_model.quantity = Set(0);
            }
        }

        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
