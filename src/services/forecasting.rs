//! Next-quarter usage forecasting.
//!
//! A least-squares line is fitted over an item's non-zero usage history and
//! evaluated one step past the last kept point. Short histories fall back to
//! averages with a fixed low confidence.

use crate::{
    entities::item::Entity as Item,
    errors::ServiceError,
    services::usage::UsageService,
};
use chrono::{Duration, NaiveDate};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Days assumed per quarter when turning a forecast into a daily rate
const DAYS_PER_QUARTER: f64 = 90.0;
/// Shortage dates further out than this are not reported
const SHORTAGE_HORIZON_DAYS: f64 = 180.0;
const FALLBACK_CONFIDENCE: f64 = 0.3;
const MAX_CONFIDENCE: f64 = 0.95;

pub const INVALID_BATCH_MESSAGE: &str = "Invalid request format. Expected \"items\" array.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    AverageFallback,
    Average,
    LinearRegression,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsagePoint {
    pub period: Option<String>,
    #[serde(default)]
    pub usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastFeatures {
    pub avg_usage_per_quarter: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastInput {
    #[serde(default)]
    pub item_id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub historical_data: Vec<UsagePoint>,
    #[serde(default)]
    pub forecast_features: ForecastFeatures,
    #[serde(default)]
    pub current_stock: f64,
}

impl ForecastInput {
    fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Item {}", self.item_id))
    }

    fn avg_feature(&self) -> f64 {
        self.forecast_features.avg_usage_per_quarter.unwrap_or(0.0)
    }
}

/// Fit statistics, present only for regression forecasts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionDetails {
    pub shortage_date: Option<String>,
    pub r_squared: f64,
    pub slope: f64,
    pub intercept: f64,
    pub data_points: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemForecast {
    pub item_id: i64,
    pub name: String,
    pub predicted_usage: i64,
    pub confidence: f64,
    pub method: ForecastMethod,
    #[serde(flatten)]
    pub regression: Option<RegressionDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchForecastRequest {
    pub items: Vec<ForecastInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchForecastResponse {
    pub success: bool,
    pub forecast: Vec<ItemForecast>,
    pub total_items: usize,
    pub method: ForecastMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchForecastError {
    pub success: bool,
    pub error: String,
}

impl BatchForecastError {
    pub fn invalid_format() -> Self {
        Self {
            success: false,
            error: INVALID_BATCH_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fit {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

fn least_squares(xs: &[f64], ys: &[f64]) -> Fit {
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let numerator: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let denominator: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();

    if denominator == 0.0 {
        return Fit {
            slope: 0.0,
            intercept: y_mean,
            r_squared: 0.0,
        };
    }

    let slope = numerator / denominator;
    let intercept = y_mean - slope * x_mean;

    let ss_res: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let ss_tot: f64 = ys.iter().map(|y| (y - y_mean).powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Fit {
        slope,
        intercept,
        r_squared,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `"%B %Y"` of the day stock runs out, when that is within the horizon
fn shortage_date(predicted: i64, current_stock: f64, today: NaiveDate) -> Option<String> {
    if predicted <= 0 || current_stock <= 0.0 {
        return None;
    }
    let daily_rate = predicted as f64 / DAYS_PER_QUARTER;
    let days = current_stock / daily_rate;
    if days >= SHORTAGE_HORIZON_DAYS {
        return None;
    }
    let date = today + Duration::days(days.floor() as i64);
    Some(date.format("%B %Y").to_string())
}

/// Forecasts next-quarter usage for one item
pub fn forecast(input: &ForecastInput, today: NaiveDate) -> ItemForecast {
    let name = input.display_name();

    if input.historical_data.is_empty() {
        warn!(item_id = input.item_id, "No historical data, using fallback");
        return ItemForecast {
            item_id: input.item_id,
            name,
            predicted_usage: input.avg_feature().round() as i64,
            confidence: FALLBACK_CONFIDENCE,
            method: ForecastMethod::AverageFallback,
            regression: None,
        };
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = input
        .historical_data
        .iter()
        .enumerate()
        .filter(|(_, point)| point.usage > 0.0)
        .map(|(idx, point)| (idx as f64, point.usage))
        .unzip();

    if ys.len() < 2 {
        warn!(
            item_id = input.item_id,
            data_points = ys.len(),
            "Insufficient data points for regression"
        );
        let average = if ys.is_empty() {
            input.avg_feature()
        } else {
            ys.iter().sum::<f64>() / ys.len() as f64
        };
        return ItemForecast {
            item_id: input.item_id,
            name,
            predicted_usage: average.round() as i64,
            confidence: FALLBACK_CONFIDENCE,
            method: ForecastMethod::Average,
            regression: None,
        };
    }

    let fit = least_squares(&xs, &ys);
    let next = ys.len() as f64;
    let predicted = (fit.slope * next + fit.intercept).round().max(0.0) as i64;
    let confidence = fit.r_squared.abs().clamp(FALLBACK_CONFIDENCE, MAX_CONFIDENCE);

    info!(
        item_id = input.item_id,
        predicted,
        confidence,
        "Forecast generated"
    );

    ItemForecast {
        item_id: input.item_id,
        name,
        predicted_usage: predicted,
        confidence: round_to(confidence, 2),
        method: ForecastMethod::LinearRegression,
        regression: Some(RegressionDetails {
            shortage_date: shortage_date(predicted, input.current_stock, today),
            r_squared: round_to(fit.r_squared, 4),
            slope: round_to(fit.slope, 2),
            intercept: round_to(fit.intercept, 2),
            data_points: ys.len(),
        }),
    }
}

/// Forecasts every item in `request`
pub fn forecast_batch(request: &BatchForecastRequest, today: NaiveDate) -> BatchForecastResponse {
    let forecast: Vec<ItemForecast> = request
        .items
        .iter()
        .map(|item| self::forecast(item, today))
        .collect();
    info!(total = forecast.len(), "Batch forecast generated");

    BatchForecastResponse {
        success: true,
        total_items: forecast.len(),
        forecast,
        method: ForecastMethod::LinearRegression,
    }
}

/// Reads a batch body, rejecting anything without an `items` array
pub fn parse_batch(body: serde_json::Value) -> Result<BatchForecastRequest, BatchForecastError> {
    match body.get("items") {
        Some(serde_json::Value::Array(_)) => {}
        _ => return Err(BatchForecastError::invalid_format()),
    }
    serde_json::from_value(body).map_err(|e| BatchForecastError {
        success: false,
        error: e.to_string(),
    })
}

/// Builds forecasts from stored usage history
#[derive(Clone)]
pub struct ForecastService {
    db: Arc<DatabaseConnection>,
    usage: UsageService,
}

impl ForecastService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            usage: UsageService::new(db.clone()),
            db,
        }
    }

    #[instrument(skip(self))]
    pub async fn forecast_item(
        &self,
        item_id: i32,
        today: NaiveDate,
    ) -> Result<ItemForecast, ServiceError> {
        let item = Item::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", item_id))?;
        let rows = self.usage.rows_for_item(item_id).await?;

        let avg_usage_per_quarter = if rows.is_empty() {
            None
        } else {
            Some(rows.iter().map(|r| r.usage as f64).sum::<f64>() / rows.len() as f64)
        };

        let input = ForecastInput {
            item_id: item.id as i64,
            name: Some(item.unit),
            historical_data: rows
                .into_iter()
                .map(|r| UsagePoint {
                    period: Some(r.period),
                    usage: r.usage as f64,
                })
                .collect(),
            forecast_features: ForecastFeatures {
                avg_usage_per_quarter,
            },
            current_stock: item.quantity as f64,
        };

        Ok(forecast(&input, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn history(usages: &[f64]) -> Vec<UsagePoint> {
        usages
            .iter()
            .enumerate()
            .map(|(i, u)| UsagePoint {
                period: Some(format!("Q{} 2024", i % 4 + 1)),
                usage: *u,
            })
            .collect()
    }

    #[test]
    fn empty_history_uses_average_feature() {
        let input = ForecastInput {
            item_id: 7,
            forecast_features: ForecastFeatures {
                avg_usage_per_quarter: Some(12.6),
            },
            ..Default::default()
        };
        let result = forecast(&input, today());
        assert_eq!(result.method, ForecastMethod::AverageFallback);
        assert_eq!(result.predicted_usage, 13);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.name, "Item 7");
        assert!(result.regression.is_none());
    }

    #[rstest]
    #[case(0.5, 1)]
    #[case(2.5, 3)]
    #[case(3.5, 4)]
    fn average_ties_round_half_away_from_zero(#[case] average: f64, #[case] expected: i64) {
        let input = ForecastInput {
            forecast_features: ForecastFeatures {
                avg_usage_per_quarter: Some(average),
            },
            ..Default::default()
        };
        assert_eq!(forecast(&input, today()).predicted_usage, expected);
    }

    #[rstest]
    #[case(&[0.0, 8.0, 0.0], 8)]
    #[case(&[0.0, 0.0], 0)]
    fn single_nonzero_point_uses_average(#[case] usages: &[f64], #[case] expected: i64) {
        let input = ForecastInput {
            item_id: 1,
            historical_data: history(usages),
            ..Default::default()
        };
        let result = forecast(&input, today());
        assert_eq!(result.method, ForecastMethod::Average);
        assert_eq!(result.predicted_usage, expected);
    }

    #[test]
    fn linear_history_predicts_next_point_exactly() {
        let input = ForecastInput {
            item_id: 1,
            name: Some("Bond paper".into()),
            historical_data: history(&[10.0, 20.0, 30.0, 40.0]),
            ..Default::default()
        };
        let result = forecast(&input, today());
        assert_eq!(result.method, ForecastMethod::LinearRegression);
        assert_eq!(result.predicted_usage, 50);
        assert_eq!(result.confidence, 0.95);

        let details = result.regression.unwrap();
        assert_eq!(details.r_squared, 1.0);
        assert_eq!(details.slope, 10.0);
        assert_eq!(details.intercept, 10.0);
        assert_eq!(details.data_points, 4);
        assert_eq!(details.shortage_date, None);
    }

    #[test]
    fn zero_usage_points_keep_their_original_index() {
        // kept points: (1, 10), (3, 30); predicted at x = 2
        let input = ForecastInput {
            historical_data: history(&[0.0, 10.0, 0.0, 30.0]),
            ..Default::default()
        };
        let result = forecast(&input, today());
        assert_eq!(result.predicted_usage, 20);
        assert_eq!(result.regression.unwrap().data_points, 2);
    }

    #[test]
    fn declining_usage_never_predicts_negative() {
        let input = ForecastInput {
            historical_data: history(&[30.0, 20.0, 10.0]),
            ..Default::default()
        };
        let result = forecast(&input, today());
        assert_eq!(result.predicted_usage, 0);
    }

    #[test]
    fn flat_history_has_zero_r_squared_and_minimum_confidence() {
        let input = ForecastInput {
            historical_data: history(&[5.0, 5.0, 5.0]),
            ..Default::default()
        };
        let result = forecast(&input, today());
        assert_eq!(result.predicted_usage, 5);
        assert_eq!(result.confidence, 0.3);
        assert_eq!(result.regression.unwrap().r_squared, 0.0);
    }

    #[test]
    fn shortage_date_within_horizon() {
        // 90 per quarter = 1 per day, 45 in stock -> 45 days
        assert_eq!(
            shortage_date(90, 45.0, today()),
            Some("February 2025".to_string())
        );
        assert_eq!(shortage_date(90, 180.0, today()), None);
        assert_eq!(shortage_date(0, 45.0, today()), None);
        assert_eq!(shortage_date(90, 0.0, today()), None);
    }

    #[test]
    fn batch_requires_items_array() {
        let err = parse_batch(serde_json::json!({"things": []})).unwrap_err();
        assert!(!err.success);
        assert_eq!(err.error, INVALID_BATCH_MESSAGE);

        let err = parse_batch(serde_json::json!({"items": {}})).unwrap_err();
        assert_eq!(err.error, INVALID_BATCH_MESSAGE);
    }

    #[test]
    fn batch_response_counts_items() {
        let request = parse_batch(serde_json::json!({
            "items": [
                {"item_id": 1, "historical_data": [{"period": "Q1 2024", "usage": 3, "timestamp": "2024-01-01"}]},
                {"item_id": 2, "name": "Toner"}
            ]
        }))
        .unwrap();
        let response = forecast_batch(&request, today());
        assert!(response.success);
        assert_eq!(response.total_items, 2);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["method"], "linear_regression");
        assert_eq!(json["forecast"][0]["method"], "average");
        assert_eq!(json["forecast"][1]["name"], "Toner");
        assert!(json["forecast"][1].get("r_squared").is_none());
    }

    #[test]
    fn regression_forecast_serializes_null_shortage_date() {
        let input = ForecastInput {
            historical_data: history(&[1.0, 2.0]),
            ..Default::default()
        };
        let json = serde_json::to_value(forecast(&input, today())).unwrap();
        assert!(json["shortage_date"].is_null());
        assert!(json.get("shortage_date").is_some());
        assert_eq!(json["data_points"], 2);
    }
}
