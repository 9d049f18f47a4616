//! ---
//! aiot_section: "02-simulation"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Labelled power datasets for training the detection model."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
//! Synthesises a multi-day household power series with a time-of-day load
//! profile, Gaussian noise, and a handful of injected high-draw anomalies.
//! The labelled output is what the external detector is trained on.
use std::io::Write;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::prelude::*;
use rand::seq::index;
use rand_distr::{Normal, Uniform};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const MINUTES_PER_DAY: u32 = 24 * 60;
const NOISE_SIGMA_KW: f64 = 0.1;
const ANOMALY_RANGE_KW: (f64, f64) = (3.0, 6.0);
/// Upper bound on the rows of one dataset (ten years at one-minute spacing).
pub const MAX_SAMPLES: usize = 3650 * MINUTES_PER_DAY as usize;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset must span at least one day")]
    ZeroDays,
    #[error("interval of {0} minutes must be non-zero and divide a day evenly")]
    InvalidInterval(u32),
    #[error("{days} days at {interval_minutes}-minute spacing exceeds {} samples", MAX_SAMPLES)]
    TooLarge { days: u32, interval_minutes: u32 },
    #[error("dataset starting at {start} runs past the supported date range")]
    OutOfRange { start: NaiveDateTime },
    #[error("cannot inject {requested} anomalies into {available} interior samples")]
    TooManyAnomalies { requested: usize, available: usize },
    #[error("invalid noise distribution: {0}")]
    Distribution(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameters of a synthesised dataset.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub start: NaiveDateTime,
    pub days: u32,
    pub interval_minutes: u32,
    pub anomaly_count: usize,
    pub seed: Option<u64>,
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 10, 16)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            days: 2,
            interval_minutes: 10,
            anomaly_count: 8,
            seed: None,
        }
    }
}

impl DatasetSpec {
    /// Total samples, after validating the time grid.
    pub fn sample_count(&self) -> Result<usize> {
        if self.days == 0 {
            return Err(DatasetError::ZeroDays);
        }
        if self.interval_minutes == 0 || MINUTES_PER_DAY % self.interval_minutes != 0 {
            return Err(DatasetError::InvalidInterval(self.interval_minutes));
        }
        let too_large = || DatasetError::TooLarge {
            days: self.days,
            interval_minutes: self.interval_minutes,
        };
        let minutes = self.days.checked_mul(MINUTES_PER_DAY).ok_or_else(too_large)?;
        let total = (minutes / self.interval_minutes) as usize;
        if total > MAX_SAMPLES {
            return Err(too_large());
        }
        Ok(total)
    }
}

/// One row of the training dataset. `is_anomaly` is 1 for injected points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledSample {
    pub timestamp: NaiveDateTime,
    #[serde(rename = "power_kW")]
    pub power_kw: f64,
    pub is_anomaly: u8,
}

/// Baseline household draw in kW for an hour of the day.
pub fn base_load_kw(hour: u32) -> f64 {
    match hour {
        0..=5 => 0.2,
        6..=8 => 0.8,
        9..=16 => 0.6,
        17..=21 => 1.5,
        _ => 0.4,
    }
}

/// Generate the labelled series. Anomalies never land on the first or last sample.
pub fn generate_dataset(spec: &DatasetSpec) -> Result<Vec<LabelledSample>> {
    let total = spec.sample_count()?;
    let interior = total.saturating_sub(2);
    if spec.anomaly_count > interior {
        return Err(DatasetError::TooManyAnomalies {
            requested: spec.anomaly_count,
            available: interior,
        });
    }

    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let noise = Normal::new(0.0, NOISE_SIGMA_KW)
        .map_err(|err| DatasetError::Distribution(err.to_string()))?;

    let step = i64::from(spec.interval_minutes);
    // every earlier timestamp is in range once the last one is
    spec.start
        .checked_add_signed(Duration::minutes(step * (total as i64 - 1)))
        .ok_or(DatasetError::OutOfRange { start: spec.start })?;
    let mut samples: Vec<LabelledSample> = (0..total)
        .map(|i| {
            let timestamp = spec.start + Duration::minutes(step * i as i64);
            let base = base_load_kw(timestamp.hour());
            LabelledSample {
                timestamp,
                power_kw: (base + noise.sample(&mut rng)).max(0.0),
                is_anomaly: 0,
            }
        })
        .collect();

    let spike = Uniform::new(ANOMALY_RANGE_KW.0, ANOMALY_RANGE_KW.1);
    for offset in index::sample(&mut rng, interior, spec.anomaly_count).iter() {
        let sample = &mut samples[offset + 1];
        sample.power_kw = spike.sample(&mut rng);
        sample.is_anomaly = 1;
    }

    debug!(
        samples = samples.len(),
        anomalies = spec.anomaly_count,
        "training dataset generated"
    );
    Ok(samples)
}

/// Write samples as CSV with a `timestamp,power_kW,is_anomaly` header.
pub fn write_csv<W: Write>(samples: &[LabelledSample], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}
