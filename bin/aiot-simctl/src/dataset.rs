//! ---
//! aiot_section: "02-simulation"
//! aiot_subsection: "binary"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Training dataset export command."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use aiot_sim::{generate_dataset, write_csv, DatasetSpec};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::Args;
use tracing::info;

#[derive(Debug, Args)]
pub struct DatasetOptions {
    /// Output file path. Use '-' for stdout.
    #[arg(long, default_value = "simulated_power_data.csv")]
    pub output: PathBuf,
    /// First timestamp, e.g. 2025-10-16T00:00:00
    #[arg(long)]
    pub start: Option<NaiveDateTime>,
    /// Number of days to synthesise
    #[arg(long, default_value_t = 2)]
    pub days: u32,
    /// Minutes between samples
    #[arg(long, default_value_t = 10)]
    pub interval_minutes: u32,
    /// Number of injected high-draw anomalies
    #[arg(long, default_value_t = 8)]
    pub anomalies: usize,
    /// Random seed for a reproducible dataset
    #[arg(long)]
    pub seed: Option<u64>,
}

impl DatasetOptions {
    fn spec(&self) -> DatasetSpec {
        let defaults = DatasetSpec::default();
        DatasetSpec {
            start: self.start.unwrap_or(defaults.start),
            days: self.days,
            interval_minutes: self.interval_minutes,
            anomaly_count: self.anomalies,
            seed: self.seed,
        }
    }
}

pub fn run(options: &DatasetOptions) -> Result<()> {
    let samples = generate_dataset(&options.spec())?;
    let writer: Box<dyn Write> = if options.output.as_os_str() == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(File::create(&options.output).with_context(|| {
            format!("failed to create output file {}", options.output.display())
        })?)
    };
    write_csv(&samples, writer)?;

    let anomalies = samples.iter().filter(|s| s.is_anomaly == 1).count();
    info!(
        samples = samples.len(),
        anomalies,
        output = %options.output.display(),
        "training dataset written"
    );
    if options.output.as_os_str() != "-" {
        eprintln!(
            "generated {} samples ({} anomalies) -> {}",
            samples.len(),
            anomalies,
            options.output.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn base_options(output: PathBuf) -> DatasetOptions {
        DatasetOptions {
            output,
            start: None,
            days: 2,
            interval_minutes: 10,
            anomalies: 8,
            seed: Some(42),
        }
    }

    #[test]
    fn writes_default_dataset_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("power.csv");
        run(&base_options(path.clone())).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("timestamp,power_kW,is_anomaly"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 288);
        assert_eq!(rows.iter().filter(|r| r.ends_with(",1")).count(), 8);
        assert!(rows[0].starts_with("2025-10-16T00:00:00,"));
    }

    #[test]
    fn start_flag_moves_the_series() {
        let mut options = base_options(PathBuf::from("-"));
        options.start = Some("2024-03-01T06:30:00".parse().unwrap());
        options.days = 1;
        let spec = options.spec();
        assert_eq!(spec.start.to_string(), "2024-03-01 06:30:00");
        assert_eq!(spec.sample_count().unwrap(), 144);
    }

    #[test]
    fn invalid_interval_is_reported() {
        let dir = tempdir().unwrap();
        let mut options = base_options(dir.path().join("bad.csv"));
        options.interval_minutes = 0;
        let err = run(&options).unwrap_err();
        assert!(err.to_string().contains("interval"), "{err}");
    }

    #[test]
    fn oversized_days_fail_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.csv");
        let mut options = base_options(path.clone());
        options.days = 3_000_000;
        let err = run(&options).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");
        assert!(!path.exists());
    }
}
