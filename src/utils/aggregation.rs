use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{Reading, TemperatureSeries};

/// Resample to one reading per calendar day holding the mean temperature,
/// stamped at midnight. NaN readings are skipped; days with none are dropped.
pub fn resample_daily_mean(series: &TemperatureSeries) -> TemperatureSeries {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for reading in series.iter().filter(|r| r.temperature.is_finite()) {
        let entry = days.entry(reading.timestamp.date()).or_insert((0.0, 0));
        entry.0 += reading.temperature;
        entry.1 += 1;
    }

    let readings = days
        .into_iter()
        .filter_map(|(date, (sum, count))| {
            Some(Reading {
                timestamp: date.and_hms_opt(0, 0, 0)?,
                temperature: sum / count as f64,
            })
        })
        .collect();

    TemperatureSeries { readings }
}

/// Summary of one box in a box plot.
///
/// Quartiles use linear interpolation; whiskers reach the most extreme data
/// point within 1.5 IQR of the box, and anything beyond is a flier.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub mean: f64,
    pub fliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let whisker_low = sorted.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
        let whisker_high = sorted.iter().rev().copied().find(|v| *v <= high_fence).unwrap_or(q3);
        let fliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();
        let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;

        Some(Self {
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            mean,
            fliers,
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_timestamp;
    use pretty_assertions::assert_eq;

    fn reading(ts: &str, temperature: f64) -> Reading {
        Reading {
            timestamp: parse_timestamp(ts).unwrap(),
            temperature,
        }
    }

    #[test]
    fn test_daily_mean() {
        let series = TemperatureSeries::new(vec![
            reading("2024-01-01 00:00:00", 10.0),
            reading("2024-01-01 12:00:00", 20.0),
            reading("2024-01-02 06:00:00", 5.0),
        ]);
        let daily = resample_daily_mean(&series);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.readings[0], reading("2024-01-01 00:00:00", 15.0));
        assert_eq!(daily.readings[1], reading("2024-01-02 00:00:00", 5.0));
    }

    #[test]
    fn test_daily_mean_skips_nan() {
        let series = TemperatureSeries::new(vec![
            reading("2024-01-01 00:00:00", f64::NAN),
            reading("2024-01-01 01:00:00", 4.0),
            reading("2024-01-02 00:00:00", f64::NAN),
        ]);
        let daily = resample_daily_mean(&series);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.readings[0].temperature, 4.0);
    }

    #[test]
    fn test_empty_data() {
        assert!(resample_daily_mean(&TemperatureSeries::default()).is_empty());
        assert_eq!(BoxStats::from_values(&[]), None);
    }

    #[test]
    fn test_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 0.25), 1.75);
        assert_eq!(quantile(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn test_box_stats_with_outlier() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(stats.median, 3.5);
        assert_eq!(stats.fliers, vec![100.0]);
        assert_eq!(stats.whisker_high, 5.0);
        assert_eq!(stats.whisker_low, 1.0);
        assert!(stats.mean > stats.median);
    }
}
