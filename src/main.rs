// Main entry point - Dependency injection and scheduler startup

use std::sync::Arc;
use std::time::Duration;

use smfarm_telemetry::application::dashboard_service::DashboardService;
use smfarm_telemetry::application::refresh::RefreshScheduler;
use smfarm_telemetry::domain::filter::FilterCriteria;
use smfarm_telemetry::infrastructure::config::load_config;
use smfarm_telemetry::infrastructure::gviz_source::GvizSource;
use smfarm_telemetry::presentation::text_view::TextView;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let cfg = load_config()?;
    tracing::info!(
        sheet = %cfg.sheet.name,
        interval_secs = cfg.refresh.interval_secs,
        "starting smfarm telemetry dashboard"
    );

    // Create the data source (infrastructure layer)
    let source = Arc::new(GvizSource::new(
        cfg.sheet.base_url,
        cfg.sheet.id,
        cfg.sheet.name,
    ));

    // Create the pipeline (application layer) with a text view
    let service = Arc::new(DashboardService::new(
        source,
        Arc::new(TextView),
        cfg.refresh.chart_points,
    ));
    let criteria = Arc::new(RwLock::new(FilterCriteria::default()));

    // First pass immediately, then refresh on the fixed interval
    let mut scheduler = RefreshScheduler::new(
        service,
        criteria,
        Duration::from_secs(cfg.refresh.interval_secs),
    );
    scheduler.start().await;

    tokio::signal::ctrl_c().await?;
    scheduler.stop();

    Ok(())
}
