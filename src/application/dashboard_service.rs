// Dashboard service - Owns the record cache and runs pipeline passes

use crate::application::export::{build_csv, CsvExport};
use crate::application::telemetry_source::{FetchCriteria, TelemetrySource};
use crate::application::view::View;
use crate::domain::chart::shape_chart;
use crate::domain::filter::{filter_records, FilterCriteria};
use crate::domain::record::TelemetryRecord;
use crate::domain::summary::summarize;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::sync::RwLock;

/// When no device is selected the fetch limit is widened so every device
/// still contributes enough rows after client-side filtering.
const ALL_DEVICES_FETCH_FACTOR: u32 = 8;

pub struct DashboardService {
    source: Arc<dyn TelemetrySource>,
    view: Arc<dyn View>,
    /// Most recently fetched rows, newest first. Replaced wholesale on each
    /// successful fetch; kept as-is when a fetch fails.
    cache: RwLock<Vec<TelemetryRecord>>,
    chart_points: usize,
}

impl DashboardService {
    pub fn new(source: Arc<dyn TelemetrySource>, view: Arc<dyn View>, chart_points: usize) -> Self {
        Self {
            source,
            view,
            cache: RwLock::new(Vec::new()),
            chart_points,
        }
    }

    /// One pipeline pass: fetch, replace the cache, filter, then hand the
    /// view KPIs, chart shape, summary and table rows. Fetch and parse
    /// errors propagate to the caller with the cache untouched.
    pub async fn run_pass(&self, criteria: &FilterCriteria) -> anyhow::Result<()> {
        let fetch = self.fetch_criteria(criteria);
        let records = self.source.fetch_records(&fetch).await?;
        tracing::debug!(rows = records.len(), "fetched telemetry rows");

        {
            let mut cache = self.cache.write().await;
            *cache = records;
        }

        let rows = {
            let cache = self.cache.read().await;
            filter_records(&cache, criteria)
        };

        let charted = &rows[..rows.len().min(self.chart_points)];
        self.view.render_kpis(rows.first());
        self.view.render_chart(&shape_chart(charted));
        self.view.render_summary(&summarize(charted));
        self.view.render_table(&rows);

        Ok(())
    }

    /// Distinct device ids currently in the cache, first-seen order, empty
    /// ids dropped. Feeds the device selector.
    pub async fn known_devices(&self) -> Vec<String> {
        let cache = self.cache.read().await;
        let mut devices: Vec<String> = Vec::new();
        for record in cache.iter() {
            if !record.device.is_empty() && !devices.contains(&record.device) {
                devices.push(record.device.clone());
            }
        }
        devices
    }

    /// Export the device-scoped cache to CSV, optionally clipped to an
    /// inclusive instant range. Bounds are assumed already validated.
    pub async fn export_csv(
        &self,
        criteria: &FilterCriteria,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> CsvExport {
        let cache = self.cache.read().await;
        let device_only = FilterCriteria {
            device: criteria.device.clone(),
            ..Default::default()
        };
        let rows = filter_records(&cache, &device_only);
        build_csv(&rows, criteria, start, end)
    }

    /// Server-side query parameters for a pass. With a date range active the
    /// limit is dropped so the range is not clipped; otherwise the chart
    /// point count bounds the fetch, widened when all devices are shown.
    fn fetch_criteria(&self, criteria: &FilterCriteria) -> FetchCriteria {
        let limit = if criteria.has_date_range() {
            None
        } else {
            let factor = if criteria.device.is_none() {
                ALL_DEVICES_FETCH_FACTOR
            } else {
                1
            };
            Some(self.chart_points as u32 * factor)
        };

        FetchCriteria {
            limit,
            start_date: criteria.start_date,
            end_date: criteria.end_date,
            // devices are filtered client-side so the selector stays complete
            device: None,
        }
    }
}
