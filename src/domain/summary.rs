// Summary statistics over a row set

use super::record::{Metric, TelemetryRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStat {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub metric: Metric,
    pub stat: SummaryStat,
}

/// Compute min/max/average per charted metric over a row set. Metrics with no
/// finite values are omitted entirely. Output order follows `Metric::CHARTED`.
/// Pure reduction, recomputed from scratch on every call.
pub fn summarize(rows: &[TelemetryRecord]) -> Vec<MetricSummary> {
    let mut summaries = Vec::new();

    for metric in Metric::CHARTED {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|r| r.metric(metric))
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            continue;
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        summaries.push(MetricSummary {
            metric,
            stat: SummaryStat {
                count: values.len(),
                average: sum / values.len() as f64,
                min,
                max,
            },
        });
    }

    summaries
}
