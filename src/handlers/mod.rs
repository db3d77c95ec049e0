pub mod categories;
pub mod common;
pub mod conditions;
pub mod forecasts;
pub mod health;
pub mod items;
pub mod locations;
pub mod maintenance;
pub mod reports;
pub mod usages;
pub mod users;

use crate::db::DbPool;
use crate::services::{
    categories::CategoryService, conditions::ConditionService, forecasting::ForecastService,
    items::ItemService, locations::LocationService, maintenance::MaintenanceService,
    reports::ReportService, usage::UsageService, users::UserService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub locations: Arc<LocationService>,
    pub conditions: Arc<ConditionService>,
    pub users: Arc<UserService>,
    pub items: Arc<ItemService>,
    pub maintenance: Arc<MaintenanceService>,
    pub usage: Arc<UsageService>,
    pub forecasts: Arc<ForecastService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            locations: Arc::new(LocationService::new(db_pool.clone())),
            conditions: Arc::new(ConditionService::new(db_pool.clone())),
            users: Arc::new(UserService::new(db_pool.clone())),
            items: Arc::new(ItemService::new(db_pool.clone())),
            maintenance: Arc::new(MaintenanceService::new(db_pool.clone())),
            usage: Arc::new(UsageService::new(db_pool.clone())),
            forecasts: Arc::new(ForecastService::new(db_pool.clone())),
            reports: Arc::new(ReportService::new(db_pool)),
        }
    }
}
