//! Database entities for the asset inventory.
//!
//! Every table carries `created_at` / `updated_at`, which are stamped in
//! `before_save` so callers never set them by hand.

pub mod category;
pub mod condition;
pub mod item;
pub mod location;
pub mod maintenance_record;
pub mod supply_usage;
pub mod user;

pub use maintenance_record::MaintenanceReason;
