// Client-side record filtering

use super::record::TelemetryRecord;
use chrono::NaiveDate;

/// Filter selection at the moment a pass runs. Not persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub device: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Derive a filtered view of the cache. Device match is exact and
/// case-sensitive; date bounds are inclusive at calendar-day granularity.
/// Records without a timestamp are dropped whenever a date bound is active.
/// Relative order of the input is preserved.
pub fn filter_records(records: &[TelemetryRecord], criteria: &FilterCriteria) -> Vec<TelemetryRecord> {
    records
        .iter()
        .filter(|r| match &criteria.device {
            Some(device) => r.device == *device,
            None => true,
        })
        .filter(|r| {
            if !criteria.has_date_range() {
                return true;
            }
            let Some(ts) = r.timestamp else {
                return false;
            };
            let day = ts.date();
            if let Some(start) = criteria.start_date {
                if day < start {
                    return false;
                }
            }
            if let Some(end) = criteria.end_date {
                if day > end {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::blank_record;
    use chrono::NaiveDate;

    fn record(device: &str, date: Option<(i32, u32, u32)>) -> TelemetryRecord {
        TelemetryRecord {
            device: device.to_string(),
            timestamp: date.map(|(y, m, d)| {
                NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap()
            }),
            ..blank_record()
        }
    }

    #[test]
    fn device_match_is_exact() {
        let records = vec![record("node-1", None), record("node-10", None)];
        let criteria = FilterCriteria {
            device: Some("node-1".to_string()),
            ..Default::default()
        };

        let filtered = filter_records(&records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].device, "node-1");
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let records = vec![
            record("a", Some((2024, 1, 3))),
            record("a", Some((2024, 1, 2))),
            record("a", Some((2024, 1, 1))),
        ];
        let criteria = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3),
            ..Default::default()
        };

        let filtered = filter_records(&records, &criteria);
        let days: Vec<u32> = filtered
            .iter()
            .map(|r| {
                use chrono::Datelike;
                r.timestamp.unwrap().date().day()
            })
            .collect();
        // descending input order preserved
        assert_eq!(days, vec![3, 2]);
    }

    #[test]
    fn missing_timestamp_excluded_when_range_active() {
        let records = vec![record("a", None), record("a", Some((2024, 1, 2)))];

        let no_range = FilterCriteria::default();
        assert_eq!(filter_records(&records, &no_range).len(), 2);

        let with_start = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert_eq!(filter_records(&records, &with_start).len(), 1);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = vec![
            record("a", Some((2024, 1, 1))),
            record("b", Some((2024, 1, 2))),
            record("a", None),
        ];
        let criteria = FilterCriteria {
            device: Some("a".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        };

        let once = filter_records(&records, &criteria);
        let twice = filter_records(&once, &criteria);
        assert_eq!(once, twice);
    }
}
