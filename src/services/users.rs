use crate::{
    entities::{
        location,
        user::{self, Entity as User},
    },
    errors::ServiceError,
    services::ensure_optional,
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
pub struct CreateUserInput {
    #[validate(length(max = 255))]
    pub fullname: Option<String>,
    #[validate(length(max = 255))]
    pub first_name: Option<String>,
    #[validate(length(max = 255))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: String,
    pub location_id: Option<i32>,
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let paginator = User::find()
            .order_by_asc(user::Column::Id)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page - 1).await?;
        Ok((users, total))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<user::Model, ServiceError> {
        User::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUserInput) -> Result<user::Model, ServiceError> {
        ensure_optional::<location::Entity, _>(&*self.db, input.location_id, "Location").await?;

        let user = user::ActiveModel {
            fullname: Set(input.fullname),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            location_id: Set(input.location_id),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.get(id).await?.delete(&*self.db).await?;
        info!(user_id = id, "User deleted");
        Ok(())
    }
}
