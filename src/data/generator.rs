use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;
use std::f64::consts::PI;

use crate::error::{VizError, VizResult};
use crate::types::{Reading, TemperatureSeries};

pub const DEFAULT_SEED: u64 = 42;
pub const HOURS_PER_DAY: usize = 24;
pub const HOURS: usize = 365 * HOURS_PER_DAY;

/// Parameters of the synthetic signal: base offset, an annual and a daily
/// sinusoid, and Gaussian noise.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub seed: u64,
    pub start: NaiveDateTime,
    pub hours: usize,
    pub base: f64,
    pub annual_amplitude: f64,
    pub daily_amplitude: f64,
    pub noise_std: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            start: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            hours: HOURS,
            base: 5.0,
            annual_amplitude: 15.0,
            daily_amplitude: 10.0,
            noise_std: 3.0,
        }
    }
}

impl GeneratorSettings {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// Generate one reading per hour from `settings.start`.
pub fn generate_temperature_data(settings: &GeneratorSettings) -> VizResult<TemperatureSeries> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let noise = Normal::new(0.0, settings.noise_std).map_err(|e| VizError::Stats(e.to_string()))?;

    let readings = (0..settings.hours)
        .map(|hour| {
            let t = hour as f64;
            let annual = settings.annual_amplitude * (2.0 * PI * t / HOURS as f64).sin();
            let daily = settings.daily_amplitude
                * (2.0 * PI * (hour % HOURS_PER_DAY) as f64 / HOURS_PER_DAY as f64).sin();
            Reading {
                timestamp: settings.start + Duration::hours(hour as i64),
                temperature: settings.base + annual + daily + noise.sample(&mut rng),
            }
        })
        .collect();

    Ok(TemperatureSeries { readings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_full_year_of_hours() {
        let series = generate_temperature_data(&GeneratorSettings::default()).unwrap();
        assert_eq!(series.len(), 365 * 24);
        assert_eq!(series.readings[0].timestamp.to_string(), "2024-01-01 00:00:00");
        let last = series.readings.last().unwrap().timestamp;
        assert_eq!(last.to_string(), "2024-12-30 23:00:00");
        assert_eq!(last.hour(), 23);
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = generate_temperature_data(&GeneratorSettings::with_seed(7)).unwrap();
        let b = generate_temperature_data(&GeneratorSettings::with_seed(7)).unwrap();
        let c = generate_temperature_data(&GeneratorSettings::with_seed(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_noise_free_signal_follows_sinusoids() {
        let settings = GeneratorSettings {
            noise_std: 1e-12,
            ..GeneratorSettings::default()
        };
        let series = generate_temperature_data(&settings).unwrap();
        // hour 6: daily term at its peak, annual term nearly zero
        let v = series.readings[6].temperature;
        let expected = 5.0 + 15.0 * (2.0 * PI * 6.0 / HOURS as f64).sin() + 10.0;
        assert!((v - expected).abs() < 1e-6);
    }

    #[test]
    fn test_short_series_keeps_the_annual_period() {
        let settings = GeneratorSettings {
            hours: 24 * 30,
            noise_std: 1e-12,
            ..GeneratorSettings::default()
        };
        let series = generate_temperature_data(&settings).unwrap();
        // hour 174 = day 7, 06:00
        let v = series.readings[174].temperature;
        let expected = 5.0 + 15.0 * (2.0 * PI * 174.0 / 8760.0).sin() + 10.0;
        assert!((v - expected).abs() < 1e-6, "got {v}, expected {expected}");
    }

    #[test]
    fn test_invalid_noise_is_rejected() {
        let settings = GeneratorSettings {
            noise_std: -1.0,
            ..GeneratorSettings::default()
        };
        assert!(matches!(generate_temperature_data(&settings), Err(VizError::Stats(_))));
    }
}
