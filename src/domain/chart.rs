// Time-series shaping for the chart renderer

use super::record::{Metric, TelemetryRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub metric: Metric,
    /// One slot per label; `None` where the reading is missing so the
    /// renderer can show a gap instead of a fabricated zero.
    pub values: Vec<Option<f64>>,
}

/// Chart-ready projection of a row set. Labels, full timestamps and every
/// series share identical length and index correspondence, in ascending
/// chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub full_timestamps: Vec<String>,
    pub series: Vec<SeriesData>,
}

/// Project a descending-timestamp row set (already truncated to the desired
/// point count) into parallel label/series arrays. The input order is
/// reversed so the chart reads left-to-right as time increases.
pub fn shape_chart(rows: &[TelemetryRecord]) -> ChartData {
    let labels = rows
        .iter()
        .rev()
        .map(|r| match r.timestamp {
            Some(ts) => ts.format("%d/%m/%y").to_string(),
            None => String::new(),
        })
        .collect();
    let full_timestamps = rows
        .iter()
        .rev()
        .map(|r| match r.timestamp {
            Some(ts) => ts.format("%d/%m/%Y %H:%M:%S").to_string(),
            None => String::new(),
        })
        .collect();

    let series = Metric::CHARTED
        .iter()
        .map(|&metric| SeriesData {
            metric,
            values: rows.iter().rev().map(|r| r.metric(metric)).collect(),
        })
        .collect();

    ChartData {
        labels,
        full_timestamps,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::blank_record;
    use chrono::NaiveDate;

    fn row(day: u32, ec: Option<f64>) -> TelemetryRecord {
        TelemetryRecord {
            timestamp: Some(
                NaiveDate::from_ymd_opt(2024, 3, day)
                    .unwrap()
                    .and_hms_opt(8, 15, 0)
                    .unwrap(),
            ),
            ec,
            ..blank_record()
        }
    }

    #[test]
    fn descending_input_becomes_ascending_output() {
        // newest first, as the store returns them
        let rows = vec![row(3, Some(3.0)), row(2, Some(2.0)), row(1, Some(1.0))];

        let chart = shape_chart(&rows);
        assert_eq!(chart.labels, vec!["01/03/24", "02/03/24", "03/03/24"]);
        assert_eq!(
            chart.full_timestamps[0],
            "01/03/2024 08:15:00".to_string()
        );

        let ec = &chart.series[0];
        assert_eq!(ec.metric, Metric::Ec);
        assert_eq!(ec.values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn all_arrays_share_length() {
        let rows = vec![row(2, Some(2.0)), row(1, None)];

        let chart = shape_chart(&rows);
        assert_eq!(chart.labels.len(), 2);
        assert_eq!(chart.full_timestamps.len(), 2);
        assert_eq!(chart.series.len(), Metric::CHARTED.len());
        for series in &chart.series {
            assert_eq!(series.values.len(), 2);
        }
    }

    #[test]
    fn missing_values_pass_through_as_gaps() {
        let rows = vec![row(2, None), row(1, Some(1.5))];

        let chart = shape_chart(&rows);
        assert_eq!(chart.series[0].values, vec![Some(1.5), None]);
    }

    #[test]
    fn empty_input_shapes_empty_chart() {
        let chart = shape_chart(&[]);
        assert!(chart.labels.is_empty());
        assert_eq!(chart.series.len(), Metric::CHARTED.len());
        assert!(chart.series.iter().all(|s| s.values.is_empty()));
    }
}
