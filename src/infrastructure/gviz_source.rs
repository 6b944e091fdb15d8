// gviz data source adapter - query construction, envelope parsing, row mapping
//
// The sheet's query endpoint answers with the JSON payload wrapped in a
// callback invocation; rows arrive as positional cell lists under table.rows.

use crate::application::telemetry_source::{FetchCriteria, TelemetrySource};
use crate::domain::record::TelemetryRecord;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("sheet request failed")]
    Network(#[source] reqwest::Error),
    #[error("sheet query returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("sheet response unparsable: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct GvizSource {
    base_url: String,
    sheet_id: String,
    sheet_name: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GvizResponse {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Option<Value>,
}

impl GvizSource {
    pub fn new(base_url: String, sheet_id: String, sheet_name: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            sheet_id,
            sheet_name,
            client: reqwest::Client::new(),
        }
    }

    /// Build the sheet query: twelve fixed columns, optional AND-joined
    /// predicates, always newest first, limit only when positive.
    fn build_query(criteria: &FetchCriteria) -> String {
        let mut predicates = Vec::new();
        if let Some(start) = criteria.start_date {
            predicates.push(format!(
                "A >= datetime {}",
                sql_quote(&format!("{start} 00:00:00"))
            ));
        }
        if let Some(end) = criteria.end_date {
            predicates.push(format!(
                "A <= datetime {}",
                sql_quote(&format!("{end} 23:59:59"))
            ));
        }
        if let Some(device) = &criteria.device {
            predicates.push(format!("B = {}", sql_quote(device)));
        }

        let where_clause = if predicates.is_empty() {
            String::new()
        } else {
            format!(" where {}", predicates.join(" and "))
        };
        let limit_clause = match criteria.limit {
            Some(limit) if limit > 0 => format!(" limit {limit}"),
            _ => String::new(),
        };

        format!("select A,B,C,D,E,F,G,H,I,J,K,L{where_clause} order by A desc{limit_clause}")
    }

    fn build_query_url(&self, criteria: &FetchCriteria) -> String {
        let query = Self::build_query(criteria);
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?sheet={}&tqx=out:json&tq={}",
            self.base_url,
            self.sheet_id,
            urlencoding::encode(&self.sheet_name),
            urlencoding::encode(&query)
        )
    }
}

#[async_trait]
impl TelemetrySource for GvizSource {
    async fn fetch_records(&self, criteria: &FetchCriteria) -> anyhow::Result<Vec<TelemetryRecord>> {
        let url = self.build_query_url(criteria);
        tracing::debug!(%url, "querying sheet");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SourceError::Network)?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()).into());
        }
        let text = response.text().await.map_err(SourceError::Network)?;

        let rows = parse_envelope(&text)?;
        Ok(rows.iter().map(|row| map_row(row)).collect())
    }
}

/// Strip the callback-invocation envelope and pull the raw cell values out of
/// table.rows, preserving null cells positionally.
pub fn parse_envelope(text: &str) -> Result<Vec<Vec<Option<Value>>>, SourceError> {
    let start = text
        .find('(')
        .ok_or_else(|| SourceError::Parse("missing opening envelope marker".to_string()))?;
    let end = text
        .rfind(')')
        .filter(|end| *end > start)
        .ok_or_else(|| SourceError::Parse("missing closing envelope marker".to_string()))?;

    let payload: GvizResponse = serde_json::from_str(&text[start + 1..end])
        .map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(payload
        .table
        .rows
        .into_iter()
        .map(|row| {
            row.c
                .into_iter()
                .map(|cell| cell.and_then(|c| c.v))
                .collect()
        })
        .collect())
}

/// Fixed positional column layout of the sheet.
mod col {
    pub const TS: usize = 0;
    pub const DEVICE: usize = 1;
    pub const DEV_EUI: usize = 2;
    pub const EC: usize = 3;
    pub const PH: usize = 4;
    pub const N: usize = 5;
    pub const P: usize = 6;
    pub const K: usize = 7;
    pub const MOI: usize = 8;
    pub const RSSI: usize = 9;
    pub const SNR: usize = 10;
    pub const BAT: usize = 11;
}

/// Map one raw row to a typed record. Total: malformed cells degrade to
/// `None` fields, never errors, since sensor dropout is expected.
pub fn map_row(row: &[Option<Value>]) -> TelemetryRecord {
    let cell = |i: usize| row.get(i).and_then(|c| c.as_ref());

    TelemetryRecord {
        timestamp: cell(col::TS).and_then(parse_timestamp),
        device: cell(col::DEVICE).map(cell_text).unwrap_or_default(),
        device_eui: cell(col::DEV_EUI).map(cell_text).unwrap_or_default(),
        ec: cell(col::EC).and_then(coerce_num),
        ph: cell(col::PH).and_then(coerce_num),
        n: cell(col::N).and_then(coerce_num),
        p: cell(col::P).and_then(coerce_num),
        k: cell(col::K).and_then(coerce_num),
        moi: cell(col::MOI).and_then(coerce_num),
        rssi: cell(col::RSSI).and_then(coerce_num),
        snr: cell(col::SNR).and_then(coerce_num),
        bat: cell(col::BAT).and_then(coerce_num),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?;
    if let Some(ts) = parse_date_token(text) {
        return Some(ts);
    }
    parse_plain_datetime(text)
}

/// Decode the sheet's `Date(Y,M,D,h,m,s)` serialization. The month is
/// zero-based in the token.
fn parse_date_token(text: &str) -> Option<NaiveDateTime> {
    let inner = text.strip_prefix("Date(")?.strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').collect();
    if parts.len() != 6 {
        return None;
    }
    let nums: Vec<i64> = parts
        .iter()
        .map(|p| p.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()?;

    chrono::NaiveDate::from_ymd_opt(nums[0] as i32, nums[1] as u32 + 1, nums[2] as u32)?
        .and_hms_opt(nums[3] as u32, nums[4] as u32, nums[5] as u32)
}

fn parse_plain_datetime(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(ts.naive_local());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}

/// Numeric coercion: finite numbers only, `None` otherwise. A `None` result
/// must stay distinguishable from zero.
fn coerce_num(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn sql_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
