// Plain-text dashboard rendering

use crate::application::view::View;
use crate::domain::chart::ChartData;
use crate::domain::record::{fmt_time, TelemetryRecord};
use crate::domain::summary::MetricSummary;

const NIL: &str = "–";
const TABLE_ROW_LIMIT: usize = 60;

/// Renders each refresh to stdout as aligned text blocks.
pub struct TextView;

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NIL.to_string())
}

impl View for TextView {
    fn render_kpis(&self, latest: Option<&TelemetryRecord>) {
        let Some(latest) = latest else {
            println!("updated {NIL}");
            return;
        };

        println!("updated {}", fmt_time(latest.timestamp.as_ref()));
        let device = match (latest.device.as_str(), latest.device_eui.as_str()) {
            ("", "") => NIL.to_string(),
            (device, "") => device.to_string(),
            ("", eui) => eui.to_string(),
            (device, eui) => format!("{device} · {eui}"),
        };
        println!(
            "  {}  EC {}  pH {}  N {}  P {}  K {}  MOI {}  BAT {}  RSSI {}  SNR {}",
            device,
            opt(latest.ec),
            opt(latest.ph),
            opt(latest.n),
            opt(latest.p),
            opt(latest.k),
            opt(latest.moi),
            opt(latest.bat),
            opt(latest.rssi),
            opt(latest.snr),
        );
    }

    fn render_summary(&self, summary: &[MetricSummary]) {
        if summary.is_empty() {
            println!("no data in the selected range");
            return;
        }
        for entry in summary {
            println!(
                "  {:<4} avg {:>8.2}  min {:>8.2}  max {:>8.2}  ({} samples)",
                entry.metric.label(),
                entry.stat.average,
                entry.stat.min,
                entry.stat.max,
                entry.stat.count,
            );
        }
    }

    fn render_chart(&self, chart: &ChartData) {
        let span = match (chart.labels.first(), chart.labels.last()) {
            (Some(first), Some(last)) => format!("{first} → {last}"),
            _ => NIL.to_string(),
        };
        println!("chart: {} points, {span}", chart.labels.len());
    }

    fn render_table(&self, rows: &[TelemetryRecord]) {
        println!(
            "  {:<19} {:<12} {:>6} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>6} {:>5}",
            "Time", "Device", "EC", "pH", "N", "P", "K", "MOI", "BAT", "RSSI", "SNR"
        );
        for row in rows.iter().take(TABLE_ROW_LIMIT) {
            println!(
                "  {:<19} {:<12} {:>6} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>6} {:>5}",
                fmt_time(row.timestamp.as_ref()),
                row.device,
                opt(row.ec),
                opt(row.ph),
                opt(row.n),
                opt(row.p),
                opt(row.k),
                opt(row.moi),
                opt(row.bat),
                opt(row.rssi),
                opt(row.snr),
            );
        }
    }
}
