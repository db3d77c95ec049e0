use crate::{
    entities::{
        category, condition,
        item::{self, Entity as Item},
        location, user,
    },
    errors::ServiceError,
    reports::{ItemWithRelations, ReportFilter},
    services::ensure_optional,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_unit_value"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateItemInput {
    #[validate(length(min = 1, max = 255))]
    pub unit: String,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub pac: Option<String>,
    #[validate(custom = "validate_non_negative")]
    #[schema(value_type = String)]
    pub unit_value: Decimal,
    pub date_acquired: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub po_number: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    pub status: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub condition_id: Option<i32>,
    pub user_id: Option<i32>,
    pub lifespan_estimate: Option<f64>,
    pub remaining_years: Option<f64>,
}

/// Partial update; absent fields are left unchanged.
///
/// Has no `maintenance_count`: only recording maintenance moves it. Unknown
/// body fields are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateItemInput {
    #[validate(length(min = 1, max = 255))]
    pub unit: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub pac: Option<String>,
    #[validate(custom = "validate_non_negative")]
    #[schema(value_type = Option<String>)]
    pub unit_value: Option<Decimal>,
    pub date_acquired: Option<NaiveDate>,
    #[validate(length(max = 255))]
    pub po_number: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    pub status: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub condition_id: Option<i32>,
    pub user_id: Option<i32>,
    pub lifespan_estimate: Option<f64>,
    pub remaining_years: Option<f64>,
}

#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Base item query with the category and location name filters applied
    fn filtered(filter: &ReportFilter) -> Select<Item> {
        let mut query = Item::find();
        if let Some(name) = filter.category() {
            query = query
                .inner_join(category::Entity)
                .filter(category::Column::Name.eq(name));
        }
        if let Some(name) = filter.location() {
            query = query
                .inner_join(location::Entity)
                .filter(location::Column::Name.eq(name));
        }
        query.order_by_asc(item::Column::Id)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: &ReportFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<ItemWithRelations>, u64), ServiceError> {
        let paginator = Self::filtered(filter).paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page - 1).await?;

        let items = attach_relations(&*self.db, items).await?;
        Ok((items, total))
    }

    /// Every item matching `filter`, relations attached, ordered by id
    #[instrument(skip(self))]
    pub async fn all_with_relations(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<ItemWithRelations>, ServiceError> {
        let items = Self::filtered(filter).all(&*self.db).await?;
        debug!(count = items.len(), "Loaded items for report");
        attach_relations(&*self.db, items).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<ItemWithRelations, ServiceError> {
        let item = self.find(id).await?;
        let mut items = attach_relations(&*self.db, vec![item]).await?;
        items
            .pop()
            .ok_or_else(|| ServiceError::not_found("Item", id))
    }

    pub(crate) async fn find(&self, id: i32) -> Result<item::Model, ServiceError> {
        Item::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", id))
    }

    async fn check_references(
        &self,
        category_id: Option<i32>,
        location_id: Option<i32>,
        condition_id: Option<i32>,
        user_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        let db = &*self.db;
        ensure_optional::<category::Entity, _>(db, category_id, "Category").await?;
        ensure_optional::<location::Entity, _>(db, location_id, "Location").await?;
        ensure_optional::<condition::Entity, _>(db, condition_id, "Condition").await?;
        ensure_optional::<user::Entity, _>(db, user_id, "User").await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateItemInput) -> Result<ItemWithRelations, ServiceError> {
        self.check_references(
            input.category_id,
            input.location_id,
            input.condition_id,
            input.user_id,
        )
        .await?;

        let item = item::ActiveModel {
            unit: Set(input.unit),
            description: Set(input.description),
            pac: Set(input.pac),
            unit_value: Set(input.unit_value),
            date_acquired: Set(input.date_acquired),
            po_number: Set(input.po_number),
            quantity: Set(input.quantity.unwrap_or(0)),
            status: Set(input.status),
            category_id: Set(input.category_id),
            location_id: Set(input.location_id),
            condition_id: Set(input.condition_id),
            user_id: Set(input.user_id),
            lifespan_estimate: Set(input.lifespan_estimate),
            remaining_years: Set(input.remaining_years),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(item_id = item.id, unit = %item.unit, "Item created");
        self.get(item.id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateItemInput,
    ) -> Result<ItemWithRelations, ServiceError> {
        let existing = self.find(id).await?;
        self.check_references(
            input.category_id,
            input.location_id,
            input.condition_id,
            input.user_id,
        )
        .await?;

        let mut item: item::ActiveModel = existing.into();
        if let Some(unit) = input.unit {
            item.unit = Set(unit);
        }
        if let Some(description) = input.description {
            item.description = Set(Some(description));
        }
        if let Some(pac) = input.pac {
            item.pac = Set(Some(pac));
        }
        if let Some(unit_value) = input.unit_value {
            item.unit_value = Set(unit_value);
        }
        if let Some(date) = input.date_acquired {
            item.date_acquired = Set(Some(date));
        }
        if let Some(po_number) = input.po_number {
            item.po_number = Set(Some(po_number));
        }
        if let Some(quantity) = input.quantity {
            item.quantity = Set(quantity);
        }
        if let Some(status) = input.status {
            item.status = Set(Some(status));
        }
        if input.category_id.is_some() {
            item.category_id = Set(input.category_id);
        }
        if input.location_id.is_some() {
            item.location_id = Set(input.location_id);
        }
        if input.condition_id.is_some() {
            item.condition_id = Set(input.condition_id);
        }
        if input.user_id.is_some() {
            item.user_id = Set(input.user_id);
        }
        if input.lifespan_estimate.is_some() {
            item.lifespan_estimate = Set(input.lifespan_estimate);
        }
        if input.remaining_years.is_some() {
            item.remaining_years = Set(input.remaining_years);
        }

        item.update(&*self.db).await?;
        info!(item_id = id, "Item updated");
        self.get(id).await
    }

    /// Deletes the item; maintenance and usage rows go with it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find(id).await?.delete(&*self.db).await?;
        info!(item_id = id, "Item deleted");
        Ok(())
    }
}

async fn lookup<E, C>(
    db: &C,
    column: E::Column,
    ids: HashSet<i32>,
) -> Result<Vec<E::Model>, ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(E::find().filter(column.is_in(ids)).all(db).await?)
}

/// Loads the four optional relations of `items` in one query each
pub(crate) async fn attach_relations<C: ConnectionTrait>(
    db: &C,
    items: Vec<item::Model>,
) -> Result<Vec<ItemWithRelations>, ServiceError> {
    let ids = |f: fn(&item::Model) -> Option<i32>| {
        items.iter().filter_map(f).collect::<HashSet<_>>()
    };

    let categories: HashMap<i32, category::Model> =
        lookup::<category::Entity, _>(db, category::Column::Id, ids(|i| i.category_id))
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
    let locations: HashMap<i32, location::Model> =
        lookup::<location::Entity, _>(db, location::Column::Id, ids(|i| i.location_id))
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
    let conditions: HashMap<i32, condition::Model> =
        lookup::<condition::Entity, _>(db, condition::Column::Id, ids(|i| i.condition_id))
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
    let users: HashMap<i32, user::Model> =
        lookup::<user::Entity, _>(db, user::Column::Id, ids(|i| i.user_id))
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

    Ok(items
        .into_iter()
        .map(|item| ItemWithRelations {
            category: item.category_id.and_then(|id| categories.get(&id).cloned()),
            location: item.location_id.and_then(|id| locations.get(&id).cloned()),
            condition: item.condition_id.and_then(|id| conditions.get(&id).cloned()),
            user: item.user_id.and_then(|id| users.get(&id).cloned()),
            item,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Decimal::new(0, 0), true)]
    #[case(Decimal::new(4599950, 2), true)]
    #[case(Decimal::new(-1, 2), false)]
    fn unit_value_must_not_be_negative(#[case] value: Decimal, #[case] ok: bool) {
        assert_eq!(validate_non_negative(&value).is_ok(), ok);
    }

    #[test]
    fn update_ignores_maintenance_count_in_body() {
        let input: UpdateItemInput =
            serde_json::from_value(serde_json::json!({"maintenance_count": 99, "quantity": 3}))
                .unwrap();
        assert_eq!(input.quantity, Some(3));
        assert!(input.unit.is_none());
    }
}
