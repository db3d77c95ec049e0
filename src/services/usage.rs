use crate::{
    common::Period,
    entities::{
        item::{self, Entity as Item},
        supply_usage::{self, Entity as SupplyUsage},
    },
    errors::ServiceError,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RecordUsageInput {
    pub item_id: i32,
    /// Quarter label such as `"Q1 2025"`; derived from today when absent or blank
    pub period: Option<String>,
    #[validate(range(min = 0))]
    pub usage: Option<i32>,
    pub stock_start: Option<i32>,
    pub stock_end: Option<i32>,
    pub restocked: Option<bool>,
    #[validate(range(min = 0))]
    pub restock_qty: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemSummary {
    pub id: i32,
    pub unit: String,
    pub description: Option<String>,
}

impl From<&item::Model> for ItemSummary {
    fn from(item: &item::Model) -> Self {
        Self {
            id: item.id,
            unit: item.unit.clone(),
            description: item.description.clone(),
        }
    }
}

/// Usage record as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageResource {
    pub id: i32,
    pub item_id: i32,
    pub period: String,
    pub usage: i32,
    pub stock_start: Option<i32>,
    pub stock_end: Option<i32>,
    pub restocked: bool,
    pub restock_qty: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UsageResource {
    pub fn new(model: supply_usage::Model, item: Option<&item::Model>) -> Self {
        Self {
            id: model.id,
            item_id: model.item_id,
            period: model.period,
            usage: model.usage,
            stock_start: model.stock_start,
            stock_end: model.stock_end,
            restocked: model.restocked,
            restock_qty: model.restock_qty,
            item: item.map(ItemSummary::from),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Resolves the stored period label: blank means the quarter containing `today`
pub fn resolve_period(period: Option<&str>, today: NaiveDate) -> Result<Period, ServiceError> {
    match period.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(Period::containing(today)),
        Some(label) => label
            .parse::<Period>()
            .map_err(|e| ServiceError::BadRequest(e.to_string())),
    }
}

/// Chronological order; labels that do not parse sort after every valid one
fn by_period(a: &supply_usage::Model, b: &supply_usage::Model) -> Ordering {
    match (a.period.parse::<Period>(), b.period.parse::<Period>()) {
        (Ok(pa), Ok(pb)) => pa.cmp(&pb).then(a.id.cmp(&b.id)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.period.cmp(&b.period).then(a.id.cmp(&b.id)),
    }
}

#[derive(Clone)]
pub struct UsageService {
    db: Arc<DatabaseConnection>,
}

impl UsageService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn item(&self, item_id: i32) -> Result<item::Model, ServiceError> {
        Item::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", item_id))
    }

    /// Raw usage rows for an item in chronological order
    pub(crate) async fn rows_for_item(
        &self,
        item_id: i32,
    ) -> Result<Vec<supply_usage::Model>, ServiceError> {
        let mut rows = SupplyUsage::find()
            .filter(supply_usage::Column::ItemId.eq(item_id))
            .order_by_asc(supply_usage::Column::Id)
            .all(&*self.db)
            .await?;
        rows.sort_by(by_period);
        Ok(rows)
    }

    #[instrument(skip(self))]
    pub async fn history(&self, item_id: i32) -> Result<Vec<UsageResource>, ServiceError> {
        let item = self.item(item_id).await?;
        let rows = self.rows_for_item(item_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| UsageResource::new(row, Some(&item)))
            .collect())
    }

    /// Stores a usage record. Several records may share an `(item_id, period)`.
    #[instrument(skip(self, input))]
    pub async fn record(
        &self,
        input: RecordUsageInput,
        today: NaiveDate,
    ) -> Result<UsageResource, ServiceError> {
        let period = resolve_period(input.period.as_deref(), today)?;
        let item = self.item(input.item_id).await?;

        if let (Some(start), Some(end)) = (input.stock_start, input.stock_end) {
            if end > start && !input.restocked.unwrap_or(false) {
                warn!(
                    item_id = item.id,
                    stock_start = start,
                    stock_end = end,
                    "Stock grew without a restock"
                );
            }
        }

        let mut usage = supply_usage::ActiveModel {
            item_id: Set(item.id),
            period: Set(period.to_string()),
            stock_start: Set(input.stock_start),
            stock_end: Set(input.stock_end),
            ..Default::default()
        };
        if let Some(value) = input.usage {
            usage.usage = Set(value);
        }
        if let Some(restocked) = input.restocked {
            usage.restocked = Set(restocked);
        }
        if let Some(qty) = input.restock_qty {
            usage.restock_qty = Set(qty);
        }

        let usage = usage.insert(&*self.db).await?;
        info!(item_id = item.id, period = %usage.period, usage = usage.usage, "Usage recorded");
        Ok(UsageResource::new(usage, Some(&item)))
    }
}
