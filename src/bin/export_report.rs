use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use asset_monitor::{
    config,
    db,
    reports::{ReportFilter, ReportSource},
    services::reports::ReportService,
};
use chrono::{Datelike, Utc};
use clap::Parser;
use tracing::info;

/// Writes the monitoring-assets workbook for the configured database
#[derive(Debug, Parser)]
#[command(name = "export-report", version, about)]
struct Cli {
    /// Only items whose category name matches exactly
    #[arg(long)]
    category: Option<String>,

    /// Only items at this location; `all` disables the filter
    #[arg(long)]
    location: Option<String>,

    /// Year shown in the report title
    #[arg(long)]
    year: Option<i32>,

    /// Destination file
    #[arg(short, long, default_value = "monitoring-assets.xlsx")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to database")?;
    if cfg.auto_migrate {
        db::run_migrations(&pool)
            .await
            .context("failed running migrations")?;
    }

    let filter = ReportFilter {
        category: cli.category,
        location: cli.location,
    };
    let category = filter.category().map(str::to_string);
    let year = cli.year.unwrap_or_else(|| Utc::now().year());

    let service = ReportService::new(Arc::new(pool));
    let bytes = service
        .export(&ReportSource::Query(filter), category, year, &cfg.report)
        .await
        .context("failed to generate report")?;

    tokio::fs::write(&cli.output, &bytes)
        .await
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    info!(path = %cli.output.display(), bytes = bytes.len(), "Report written");
    println!("{}", cli.output.display());
    Ok(())
}
