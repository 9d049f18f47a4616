//! ---
//! aiot_section: "02-simulation"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Synthetic power streams submitted by the panel."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
use chrono::{DateTime, Duration, SubsecRound, Utc};
use rand::prelude::*;

use crate::model::{DataPoint, Regime, SimulationRequest};

/// Number of points in every submitted series.
pub const SERIES_LEN: usize = 3;
/// Spacing between consecutive points.
pub const SAMPLE_SPACING_MINUTES: i64 = 10;

/// Build a series of [`SERIES_LEN`] points ending at `now`, oldest first.
///
/// Power is drawn uniformly from the regime's 2-decimal grid, so every value
/// already carries exactly two decimals and stays inside `[low, high)`.
pub fn generate_time_series<R>(regime: Regime, now: DateTime<Utc>, rng: &mut R) -> SimulationRequest
where
    R: Rng + ?Sized,
{
    let now = now.trunc_subsecs(3);
    let (low, high) = regime.power_hundredths();
    let time_series = (0..SERIES_LEN)
        .rev()
        .map(|steps_back| {
            let hundredths = rng.gen_range(low..high);
            DataPoint {
                timestamp: now - Duration::minutes(SAMPLE_SPACING_MINUTES * steps_back as i64),
                power_kw: f64::from(hundredths) / 100.0,
            }
        })
        .collect();
    SimulationRequest { time_series }
}

/// Generates request payloads from the wall clock and an owned random source.
#[derive(Debug)]
pub struct TimeSeriesGenerator {
    rng: StdRng,
}

impl TimeSeriesGenerator {
    /// A seeded generator is reproducible; `None` draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn generate(&mut self, regime: Regime) -> SimulationRequest {
        self.generate_at(regime, Utc::now())
    }

    pub fn generate_at(&mut self, regime: Regime, now: DateTime<Utc>) -> SimulationRequest {
        generate_time_series(regime, now, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assert_series_shape(request: &SimulationRequest, regime: Regime) {
        assert_eq!(request.time_series.len(), SERIES_LEN);
        let (low, high) = regime.power_range_kw();
        for point in &request.time_series {
            assert!(
                point.power_kw >= low && point.power_kw < high,
                "{} outside [{low}, {high}) for {regime}",
                point.power_kw
            );
            let scaled = point.power_kw * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
        for pair in request.time_series.windows(2) {
            assert_eq!(
                pair[1].timestamp - pair[0].timestamp,
                Duration::minutes(SAMPLE_SPACING_MINUTES)
            );
        }
    }

    #[test]
    fn both_regimes_respect_shape_and_range() {
        let mut generator = TimeSeriesGenerator::new(Some(42));
        for _ in 0..500 {
            for regime in [Regime::Normal, Regime::Anomalous] {
                let request = generator.generate(regime);
                assert_series_shape(&request, regime);
            }
        }
    }

    #[test]
    fn series_ends_at_now() {
        let now = Utc.with_ymd_and_hms(2025, 10, 16, 2, 30, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let mut rng = StdRng::seed_from_u64(7);
        let request = generate_time_series(Regime::Normal, now, &mut rng);
        let last = request.time_series.last().unwrap();
        assert_eq!(last.timestamp, now.trunc_subsecs(3));
        assert_eq!(
            request.time_series[0].timestamp,
            Utc.with_ymd_and_hms(2025, 10, 16, 2, 10, 0).unwrap() + Duration::milliseconds(123)
        );
    }

    #[test]
    fn seeded_generators_agree() {
        let now = Utc::now();
        let mut a = TimeSeriesGenerator::new(Some(0x5EED));
        let mut b = TimeSeriesGenerator::new(Some(0x5EED));
        assert_eq!(
            a.generate_at(Regime::Anomalous, now),
            b.generate_at(Regime::Anomalous, now)
        );
    }
}
