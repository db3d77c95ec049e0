use crate::{
    entities::condition::{self, Entity as Condition},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ConditionInput {
    #[validate(length(min = 1, max = 255))]
    pub label: String,
}

#[derive(Clone)]
pub struct ConditionService {
    db: Arc<DatabaseConnection>,
}

impl ConditionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<condition::Model>, u64), ServiceError> {
        let paginator = Condition::find()
            .order_by_asc(condition::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let conditions = paginator.fetch_page(page - 1).await?;
        Ok((conditions, total))
    }

    async fn get(&self, id: i32) -> Result<condition::Model, ServiceError> {
        Condition::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Condition", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: ConditionInput) -> Result<condition::Model, ServiceError> {
        let condition = condition::ActiveModel {
            label: Set(input.label),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(condition_id = condition.id, "Condition created");
        Ok(condition)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: ConditionInput,
    ) -> Result<condition::Model, ServiceError> {
        let mut condition: condition::ActiveModel = self.get(id).await?.into();
        condition.label = Set(input.label);
        Ok(condition.update(&*self.db).await?)
    }

    /// Deleting a condition cascades to the maintenance records that reference it
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(condition_id = id, "Condition deleted");
        Ok(())
    }
}
