use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Quarterly consumption record for an item.
///
/// `period` holds a label such as `"Q1 2025"`. `(item_id, period)` is indexed
/// but not unique, so several rows may share a quarter.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "supply_usages")]
#[schema(as = SupplyUsage)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub period: String,
    pub usage: i32,
    pub stock_start: Option<i32>,
    pub stock_end: Option<i32>,
    pub restocked: bool,
    pub restock_qty: i32,
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
            if let ActiveValue::NotSet = active_model.usage {
                active_model.usage = Set(0);
            }
            if let ActiveValue::NotSet = active_model.restocked {
                active_model.restocked = Set(false);
            }
            if let ActiveValue::NotSet = active_model.restock_qty {
                active_model.restock_qty = Set(0);
            }
        }

        active_model.updated_at = Set(now);
        Ok(active_model)
    }
}
