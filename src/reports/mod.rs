//! Monitoring-assets report: row shapes, source adapters and the XLSX renderer.
//!
//! Rows reach the renderer in one normalized shape, [`ReportRow`]. Each input
//! shape has its own adapter with explicit fallback rules, so a missing
//! relation or alias never leaks past this module.

pub mod monitoring_assets;

use crate::entities::{category, condition, item, location, user};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use monitoring_assets::{MonitoringAssetsReport, SheetPlan};

/// Issued-to text used when an item has nobody assigned
pub const NOT_ASSIGNED: &str = "Not Assigned";

/// Location filter value that disables location filtering
pub const ALL_LOCATIONS: &str = "all";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Filters applied when report rows are queried from the store.
///
/// Both comparisons are exact and case-sensitive. A location of `"all"`
/// behaves like no location filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ReportFilter {
    pub category: Option<String>,
    pub location: Option<String>,
}

impl ReportFilter {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Effective location filter, `None` for absent, empty or `"all"`
    pub fn location(&self) -> Option<&str> {
        self.location
            .as_deref()
            .filter(|l| !l.is_empty() && *l != ALL_LOCATIONS)
    }
}

/// Where report rows come from
#[derive(Debug, Clone)]
pub enum ReportSource {
    /// Query all items, applying the filter
    Query(ReportFilter),
    /// Caller-supplied rows, used as given
    Supplied(Vec<SuppliedRow>),
}

/// A caller-supplied row in one of the two accepted shapes.
///
/// On the wire a row is read as an item with relations when it carries the
/// full item record, and as a flat raw row otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuppliedRow {
    Related(ItemWithRelations),
    Raw(RawRow),
}

/// An item together with the relations the report needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemWithRelations {
    #[serde(flatten)]
    pub item: item::Model,
    pub category: Option<category::Model>,
    pub location: Option<location::Model>,
    pub condition: Option<condition::Model>,
    pub user: Option<user::Model>,
}

/// Scalar cell as supplied by a client: a JSON number or a string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }

    /// Whole count; unparseable text counts as zero
    fn count(&self) -> i64 {
        match self {
            RawValue::Number(n) => *n as i64,
            RawValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .or_else(|_| s.parse::<f64>().map(|n| n as i64))
                    .unwrap_or(0)
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

/// Flat row as posted by the frontend. Camel-case keys win over their
/// snake-case aliases when both are present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct RawRow {
    pub article: Option<RawValue>,
    pub unit: Option<RawValue>,
    pub description: Option<RawValue>,
    #[serde(rename = "propertyAccountCode")]
    pub property_account_code: Option<RawValue>,
    pub pac: Option<RawValue>,
    #[serde(rename = "unitValue")]
    pub unit_value_camel: Option<RawValue>,
    pub unit_value: Option<RawValue>,
    #[serde(rename = "dateAcquired")]
    pub date_acquired_camel: Option<RawValue>,
    pub date_acquired: Option<RawValue>,
    #[serde(rename = "poNumber")]
    pub po_number_camel: Option<RawValue>,
    pub po_number: Option<RawValue>,
    pub location: Option<RawValue>,
    pub category: Option<RawValue>,
    pub condition: Option<RawValue>,
    #[serde(rename = "issuedTo")]
    pub issued_to_camel: Option<RawValue>,
    pub issued_to: Option<RawValue>,
    pub quantity: Option<RawValue>,
}

/// One spreadsheet cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

/// Normalized report row, one field per output column
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub article: String,
    pub description: String,
    pub property_account_code: String,
    pub unit_value: CellValue,
    pub date_acquired: String,
    pub po_number: String,
    pub location: String,
    pub category: String,
    pub condition: String,
    pub issued_to: String,
    pub quantity: i64,
}

impl ReportRow {
    /// Cells in column order A..K
    pub fn cells(&self) -> [CellValue; 11] {
        [
            CellValue::Text(self.article.clone()),
            CellValue::Text(self.description.clone()),
            CellValue::Text(self.property_account_code.clone()),
            self.unit_value.clone(),
            CellValue::Text(self.date_acquired.clone()),
            CellValue::Text(self.po_number.clone()),
            CellValue::Text(self.location.clone()),
            CellValue::Text(self.category.clone()),
            CellValue::Text(self.condition.clone()),
            CellValue::Text(self.issued_to.clone()),
            CellValue::Number(self.quantity as f64),
        ]
    }
}

impl From<&RawRow> for ReportRow {
    fn from(raw: &RawRow) -> Self {
        let text = |value: &Option<RawValue>| value.as_ref().map(RawValue::text);
        let pick = |primary: &Option<RawValue>, alias: &Option<RawValue>| {
            text(primary).or_else(|| text(alias)).unwrap_or_default()
        };

        let unit_value = match raw.unit_value_camel.as_ref().or(raw.unit_value.as_ref()) {
            Some(RawValue::Number(n)) => CellValue::Number(*n),
            Some(RawValue::Text(s)) => match s.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) if s.is_empty() => CellValue::Empty,
                Err(_) => CellValue::Text(s.clone()),
            },
            None => CellValue::Empty,
        };

        ReportRow {
            article: pick(&raw.article, &raw.unit),
            description: text(&raw.description).unwrap_or_default(),
            property_account_code: pick(&raw.property_account_code, &raw.pac),
            unit_value,
            date_acquired: pick(&raw.date_acquired_camel, &raw.date_acquired),
            po_number: pick(&raw.po_number_camel, &raw.po_number),
            location: text(&raw.location).unwrap_or_default(),
            category: text(&raw.category).unwrap_or_default(),
            condition: text(&raw.condition).unwrap_or_default(),
            issued_to: text(&raw.issued_to_camel)
                .or_else(|| text(&raw.issued_to))
                .unwrap_or_else(|| NOT_ASSIGNED.to_string()),
            quantity: raw.quantity.as_ref().map(RawValue::count).unwrap_or(0),
        }
    }
}

impl From<&ItemWithRelations> for ReportRow {
    fn from(row: &ItemWithRelations) -> Self {
        let item = &row.item;
        ReportRow {
            article: item.unit.clone(),
            description: item.description.clone().unwrap_or_default(),
            property_account_code: item.pac.clone().unwrap_or_default(),
            unit_value: item
                .unit_value
                .to_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Empty),
            date_acquired: item
                .date_acquired
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            po_number: item.po_number.clone().unwrap_or_default(),
            location: row
                .location
                .as_ref()
                .map(|l| l.name.clone())
                .unwrap_or_default(),
            category: row
                .category
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            condition: row
                .condition
                .as_ref()
                .map(|c| c.label.clone())
                .unwrap_or_default(),
            issued_to: row
                .user
                .as_ref()
                .and_then(user::Model::display_name)
                .unwrap_or_else(|| NOT_ASSIGNED.to_string()),
            quantity: item.quantity as i64,
        }
    }
}

impl From<&SuppliedRow> for ReportRow {
    fn from(row: &SuppliedRow) -> Self {
        match row {
            SuppliedRow::Raw(raw) => raw.into(),
            SuppliedRow::Related(related) => related.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    pub fn item(id: i32) -> item::Model {
        item::Model {
            id,
            unit: "Desktop Computer".into(),
            description: Some("Core i5, 8GB".into()),
            pac: Some("10605030".into()),
            unit_value: Decimal::new(4599950, 2),
            date_acquired: NaiveDate::from_ymd_opt(2023, 7, 14),
            po_number: Some("PO-2023-118".into()),
            quantity: 2,
            status: None,
            category_id: None,
            location_id: None,
            condition_id: None,
            user_id: None,
            maintenance_count: 0,
            lifespan_estimate: None,
            remaining_years: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn bare(id: i32) -> ItemWithRelations {
        ItemWithRelations {
            item: item(id),
            category: None,
            location: None,
            condition: None,
            user: None,
        }
    }
}
