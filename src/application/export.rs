// CSV export with instant-range filtering and quoting

use crate::domain::filter::FilterCriteria;
use crate::domain::record::{fmt_time, TelemetryRecord};
use chrono::NaiveDateTime;
use thiserror::Error;

const CSV_HEADER: &str = "Time,Device,EC,pH,N,P,K,MOI,BAT,RSSI,SNR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("export start time is required")]
    MissingStart,
    #[error("export end time is required")]
    MissingEnd,
    #[error("export end time precedes start time")]
    InvertedRange,
}

/// A named CSV blob ready to hand to a file sink.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

impl CsvExport {
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Caller-level validation for the export dialog: both instants present and
/// not inverted. `build_csv` itself assumes valid bounds and does not
/// re-check.
pub fn validate_export_bounds(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<(), ExportError> {
    let start = start.ok_or(ExportError::MissingStart)?;
    let end = end.ok_or(ExportError::MissingEnd)?;
    if end < start {
        return Err(ExportError::InvertedRange);
    }
    Ok(())
}

/// Serialize a row set to CSV. Optional bounds are inclusive instants, finer
/// than the calendar-date filter; rows without a timestamp are dropped
/// whenever a bound is active. The filename encodes the device scope and the
/// boundary instants, falling back to the coarse filter dates.
pub fn build_csv(
    rows: &[TelemetryRecord],
    criteria: &FilterCriteria,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> CsvExport {
    let mut lines = vec![CSV_HEADER.to_string()];

    for row in rows {
        if start.is_some() || end.is_some() {
            let Some(ts) = row.timestamp else { continue };
            if start.is_some_and(|s| ts < s) || end.is_some_and(|e| ts > e) {
                continue;
            }
        }

        let fields = [
            fmt_time(row.timestamp.as_ref()),
            row.device.clone(),
            opt_field(row.ec),
            opt_field(row.ph),
            opt_field(row.n),
            opt_field(row.p),
            opt_field(row.k),
            opt_field(row.moi),
            opt_field(row.bat),
            opt_field(row.rssi),
            opt_field(row.snr),
        ];
        let line: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
        lines.push(line.join(","));
    }

    CsvExport {
        filename: derive_filename(criteria, start, end),
        content: lines.join("\n"),
    }
}

fn opt_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn quote_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn derive_filename(
    criteria: &FilterCriteria,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> String {
    let device = criteria.device.as_deref().unwrap_or("all");
    let from = match (start, criteria.start_date) {
        (Some(s), _) => s.format("%Y-%m-%d_%H-%M").to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => "start".to_string(),
    };
    let to = match (end, criteria.end_date) {
        (Some(e), _) => e.format("%Y-%m-%d_%H-%M").to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => "end".to_string(),
    };
    format!("smfarm-{device}-{from}_to_{to}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::blank_record;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn comma_fields_are_quoted() {
        let rows = vec![TelemetryRecord {
            device: "node,1".to_string(),
            ..blank_record()
        }];

        let export = build_csv(&rows, &FilterCriteria::default(), None, None);
        let line = export.content.lines().nth(1).unwrap();
        assert!(line.starts_with("–,\"node,1\","));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let rows = vec![TelemetryRecord {
            device: "node\"7".to_string(),
            ..blank_record()
        }];

        let export = build_csv(&rows, &FilterCriteria::default(), None, None);
        assert!(export.content.contains("\"node\"\"7\""));
    }

    #[test]
    fn empty_row_set_emits_header_only() {
        let export = build_csv(&[], &FilterCriteria::default(), None, None);
        assert_eq!(export.content, "Time,Device,EC,pH,N,P,K,MOI,BAT,RSSI,SNR");
    }

    #[test]
    fn missing_values_render_empty() {
        let rows = vec![TelemetryRecord {
            timestamp: Some(at(5, 10)),
            device: "n1".to_string(),
            ec: Some(1.8),
            ..blank_record()
        }];

        let export = build_csv(&rows, &FilterCriteria::default(), None, None);
        assert_eq!(
            export.content.lines().nth(1).unwrap(),
            "2024-01-05 10:00:00,n1,1.8,,,,,,,,"
        );
    }

    #[test]
    fn instant_bounds_filter_rows() {
        let rows = vec![
            TelemetryRecord {
                timestamp: Some(at(5, 18)),
                ..blank_record()
            },
            TelemetryRecord {
                timestamp: Some(at(5, 10)),
                ..blank_record()
            },
            TelemetryRecord {
                timestamp: None,
                ..blank_record()
            },
        ];

        let export = build_csv(
            &rows,
            &FilterCriteria::default(),
            Some(at(5, 10)),
            Some(at(5, 12)),
        );
        // header + the 10:00 row; null timestamp excluded under active bounds
        assert_eq!(export.content.lines().count(), 2);
        assert!(export.content.contains("2024-01-05 10:00:00"));
    }

    #[test]
    fn filename_encodes_scope_and_instants() {
        let criteria = FilterCriteria {
            device: Some("node-3".to_string()),
            ..Default::default()
        };
        let export = build_csv(&[], &criteria, Some(at(5, 10)), Some(at(6, 12)));
        assert_eq!(
            export.filename,
            "smfarm-node-3-2024-01-05_10-00_to_2024-01-06_12-00.csv"
        );
    }

    #[test]
    fn filename_falls_back_to_filter_dates() {
        let criteria = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        let export = build_csv(&[], &criteria, None, None);
        assert_eq!(export.filename, "smfarm-all-2024-01-01_to_end.csv");
    }

    #[test]
    fn bounds_validation() {
        assert_eq!(
            validate_export_bounds(None, Some(at(5, 0))),
            Err(ExportError::MissingStart)
        );
        assert_eq!(
            validate_export_bounds(Some(at(5, 0)), None),
            Err(ExportError::MissingEnd)
        );
        assert_eq!(
            validate_export_bounds(Some(at(6, 0)), Some(at(5, 0))),
            Err(ExportError::InvertedRange)
        );
        assert_eq!(validate_export_bounds(Some(at(5, 0)), Some(at(5, 0))), Ok(()));
    }
}
