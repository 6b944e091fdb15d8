// View port the pipeline renders through

use crate::domain::chart::ChartData;
use crate::domain::record::TelemetryRecord;
use crate::domain::summary::MetricSummary;

/// Presentation capability. The pipeline calls these with fully computed
/// data; implementations hold no pipeline state.
pub trait View: Send + Sync {
    fn render_kpis(&self, latest: Option<&TelemetryRecord>);
    fn render_summary(&self, summary: &[MetricSummary]);
    fn render_chart(&self, chart: &ChartData);
    fn render_table(&self, rows: &[TelemetryRecord]);
}
