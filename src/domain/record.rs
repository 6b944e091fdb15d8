// Telemetry domain models

use chrono::NaiveDateTime;

/// One timestamped sensor reading. Numeric fields are `None` when the
/// source cell was absent or unparsable; absence is distinct from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub device: String,
    pub device_eui: String,
    pub ec: Option<f64>,
    pub ph: Option<f64>,
    pub n: Option<f64>,
    pub p: Option<f64>,
    pub k: Option<f64>,
    pub moi: Option<f64>,
    pub rssi: Option<f64>,
    pub snr: Option<f64>,
    pub bat: Option<f64>,
}

impl TelemetryRecord {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Ec => self.ec,
            Metric::Ph => self.ph,
            Metric::N => self.n,
            Metric::P => self.p,
            Metric::K => self.k,
            Metric::Moi => self.moi,
            Metric::Rssi => self.rssi,
            Metric::Snr => self.snr,
            Metric::Bat => self.bat,
        }
    }
}

/// The numeric metrics a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Ec,
    Ph,
    N,
    P,
    K,
    Moi,
    Rssi,
    Snr,
    Bat,
}

impl Metric {
    /// The fixed set summarized and charted, in display order. RSSI and SNR
    /// are link-quality indicators shown only as KPIs.
    pub const CHARTED: [Metric; 7] = [
        Metric::Ec,
        Metric::Ph,
        Metric::N,
        Metric::P,
        Metric::K,
        Metric::Moi,
        Metric::Bat,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Ec => "EC",
            Metric::Ph => "pH",
            Metric::N => "N",
            Metric::P => "P",
            Metric::K => "K",
            Metric::Moi => "MOI",
            Metric::Rssi => "RSSI",
            Metric::Snr => "SNR",
            Metric::Bat => "BAT",
        }
    }
}

/// Format a timestamp for display and CSV output.
pub fn fmt_time(ts: Option<&NaiveDateTime>) -> String {
    match ts {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "–".to_string(),
    }
}

#[cfg(test)]
pub(crate) fn blank_record() -> TelemetryRecord {
    TelemetryRecord {
        timestamp: None,
        device: String::new(),
        device_eui: String::new(),
        ec: None,
        ph: None,
        n: None,
        p: None,
        k: None,
        moi: None,
        rssi: None,
        snr: None,
        bat: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn metric_accessor_matches_fields() {
        let record = TelemetryRecord {
            ec: Some(1.8),
            bat: Some(87.0),
            ..blank_record()
        };
        assert_eq!(record.metric(Metric::Ec), Some(1.8));
        assert_eq!(record.metric(Metric::Bat), Some(87.0));
        assert_eq!(record.metric(Metric::Ph), None);
    }

    #[test]
    fn fmt_time_placeholder_for_missing() {
        assert_eq!(fmt_time(None), "–");

        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(fmt_time(Some(&ts)), "2024-01-15 10:30:00");
    }
}
