use crate::{
    entities::category::{self, Entity as Category},
    errors::ServiceError,
};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Body for creating or replacing a category
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists categories ordered by id, returning the page and the total count
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let paginator = Category::find()
            .order_by_asc(category::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!("Failed to count categories: {}", e);
            ServiceError::DatabaseError(e)
        })?;
        let categories = paginator.fetch_page(page - 1).await?;

        Ok((categories, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<category::Model, ServiceError> {
        Category::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CategoryInput) -> Result<category::Model, ServiceError> {
        let category = category::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(category_id = category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: CategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let mut category: category::ActiveModel = self.get(id).await?.into();
        category.name = Set(input.name);
        let category = category.update(&*self.db).await?;

        info!(category_id = id, "Category updated");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let category = self.get(id).await?;
        category.delete(&*self.db).await?;

        info!(category_id = id, "Category deleted");
        Ok(())
    }
}
