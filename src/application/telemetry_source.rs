// Source port for telemetry data access

use crate::domain::record::TelemetryRecord;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Server-side query parameters. Date bounds are pushed down to the store so
/// a ranged fetch is not clipped by the row limit; the device predicate is
/// also expressible here, though the dashboard filters devices client-side to
/// keep the full device list available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchCriteria {
    pub limit: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub device: Option<String>,
}

/// Capability over the remote tabular store. Implementations return records
/// in descending-timestamp order; the pipeline never re-sorts.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch_records(&self, criteria: &FetchCriteria) -> anyhow::Result<Vec<TelemetryRecord>>;
}
