use crate::{
    entities::location::{self, Entity as Location},
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

/// Body for creating or replacing a location
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct LocationInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub personnel: Option<String>,
}

#[derive(Clone)]
pub struct LocationService {
    db: Arc<DatabaseConnection>,
}

impl LocationService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<location::Model>, u64), ServiceError> {
        let paginator = Location::find()
            .order_by_asc(location::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let locations = paginator.fetch_page(page - 1).await?;
        Ok((locations, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<location::Model, ServiceError> {
        Location::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Location", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: LocationInput) -> Result<location::Model, ServiceError> {
        let location = location::ActiveModel {
            name: Set(input.name),
            personnel: Set(input.personnel),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(location_id = location.id, "Location created");
        Ok(location)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: LocationInput,
    ) -> Result<location::Model, ServiceError> {
        let mut location: location::ActiveModel = self.get(id).await?.into();
        location.name = Set(input.name);
        location.personnel = Set(input.personnel);
        let location = location.update(&*self.db).await?;

        info!(location_id = id, "Location updated");
        Ok(location)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(location_id = id, "Location deleted");
        Ok(())
    }
}
