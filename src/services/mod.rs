pub mod categories;
pub mod conditions;
pub mod forecasting;
pub mod items;
pub mod locations;
pub mod maintenance;
pub mod reports;
pub mod usage;
pub mod users;

use crate::errors::ServiceError;
use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

/// Fails with `NotFound` unless a row of `E` with primary key `id` exists
pub(crate) async fn ensure_exists<E, C>(db: &C, id: i32, entity: &str) -> Result<(), ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    match E::find_by_id(id).one(db).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::not_found(entity, id)),
    }
}

/// Runs [`ensure_exists`] when an optional foreign key is present
pub(crate) async fn ensure_optional<E, C>(
    db: &C,
    id: Option<i32>,
    entity: &str,
) -> Result<(), ServiceError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    match id {
        Some(id) => ensure_exists::<E, C>(db, id, entity).await,
        None => Ok(()),
    }
}
