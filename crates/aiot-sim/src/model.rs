//! ---
//! aiot_section: "02-simulation"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Wire types exchanged with the anomaly-detection service."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// `is_anomaly` value the backend uses to flag an anomalous point.
pub const ANOMALOUS_LABEL: i64 = -1;

/// Simulation mode selecting the sampled power range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Regime {
    /// Low overnight draw.
    Normal,
    /// Sudden high draw outside peak hours.
    Anomalous,
}

impl Regime {
    /// Half-open power range `[low, high)` in hundredths of a kW.
    pub const fn power_hundredths(self) -> (u32, u32) {
        match self {
            Regime::Normal => (20, 50),
            Regime::Anomalous => (400, 700),
        }
    }

    /// Half-open power range `[low, high)` in kW.
    pub fn power_range_kw(self) -> (f64, f64) {
        let (low, high) = self.power_hundredths();
        (f64::from(low) / 100.0, f64::from(high) / 100.0)
    }
}

/// A single power sample as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "power_kW")]
    pub power_kw: f64,
}

/// A power sample as echoed back by the backend, optionally annotated with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "power_kW")]
    pub power_kw: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anomaly: Option<i64>,
}

impl ScoredPoint {
    /// True only when the backend labelled the point with [`ANOMALOUS_LABEL`].
    pub fn is_anomalous(&self) -> bool {
        self.is_anomaly == Some(ANOMALOUS_LABEL)
    }
}

impl From<DataPoint> for ScoredPoint {
    fn from(point: DataPoint) -> Self {
        Self {
            timestamp: point.timestamp,
            power_kw: point.power_kw,
            anomaly_score: None,
            is_anomaly: None,
        }
    }
}

/// Body of `POST /predict_anomaly`. Oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub time_series: Vec<DataPoint>,
}

/// Response of `POST /predict_anomaly`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub status: String,
    pub average_anomaly_score: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_data_preview: Option<Vec<ScoredPoint>>,
}

/// Parse an ISO-8601 timestamp. Offsets are honoured; naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
}

/// RFC 3339 with millisecond precision and a `Z` suffix on the way out, lenient on the way in.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .map_err(|err| de::Error::custom(format!("invalid timestamp {raw:?}: {err}")))
    }
}
