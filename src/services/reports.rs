use crate::{
    config::ReportConfig,
    errors::ServiceError,
    reports::{MonitoringAssetsReport, ReportRow, ReportSource},
    services::items::ItemService,
    tracing::with_metrics,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, instrument};

/// Assembles report rows and renders the monitoring-assets workbook
#[derive(Clone)]
pub struct ReportService {
    items: ItemService,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            items: ItemService::new(db),
        }
    }

    /// Normalized rows for `source`. Supplied rows skip filtering entirely.
    #[instrument(skip(self, source))]
    pub async fn assemble(&self, source: &ReportSource) -> Result<Vec<ReportRow>, ServiceError> {
        let rows = match source {
            ReportSource::Query(filter) => self
                .items
                .all_with_relations(filter)
                .await?
                .iter()
                .map(ReportRow::from)
                .collect(),
            ReportSource::Supplied(rows) => rows.iter().map(ReportRow::from).collect(),
        };
        Ok(rows)
    }

    /// Renders the workbook for `source` and returns the XLSX bytes
    #[instrument(skip(self, source, config))]
    pub async fn export(
        &self,
        source: &ReportSource,
        category: Option<String>,
        year: i32,
        config: &ReportConfig,
    ) -> Result<Vec<u8>, ServiceError> {
        with_metrics("report.monitoring_assets", async {
            let rows = self.assemble(source).await?;
            let bytes = MonitoringAssetsReport::new(year)
                .letterhead(&config.letterhead)
                .logo_path(&config.logo_path)
                .category(category)
                .render(&rows)?;

            info!(rows = rows.len(), bytes = bytes.len(), year, "Monitoring report rendered");
            Ok::<_, ServiceError>(bytes)
        })
        .await
    }
}
