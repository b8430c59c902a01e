use chrono::{Datelike, Timelike};
use ndarray::Array2;
use std::collections::BTreeMap;

use crate::types::{GroupBy, TemperatureSeries, TimeGranularity};

/// Temperature values grouped by month, day of month or hour, in key order.
pub fn group_values(series: &TemperatureSeries, group_by: GroupBy) -> BTreeMap<u32, Vec<f64>> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for reading in series.iter() {
        let key = match group_by {
            GroupBy::Month => reading.timestamp.month(),
            GroupBy::Day => reading.timestamp.day(),
            GroupBy::Hour => reading.timestamp.hour(),
        };
        groups.entry(key).or_default().push(reading.temperature);
    }
    groups
}

/// Tick label for a group key.
pub fn group_label(group_by: GroupBy, key: u32) -> String {
    match group_by {
        GroupBy::Month => super::calendar::month_abbr(key).to_string(),
        GroupBy::Day => key.to_string(),
        GroupBy::Hour => format!("{:02}:00", key),
    }
}

/// Axis title used when the configuration leaves `axis.xlabel` null.
pub fn group_axis_title(group_by: GroupBy) -> &'static str {
    match group_by {
        GroupBy::Month => "Month",
        GroupBy::Day => "Day",
        GroupBy::Hour => "Hour",
    }
}

/// Mean temperature per (row, column) cell.
///
/// Row and column keys are sorted; cells without readings hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub row_keys: Vec<i32>,
    pub col_keys: Vec<i32>,
    pub values: Array2<f64>,
}

impl PivotTable {
    pub fn shape(&self) -> (usize, usize) {
        (self.row_keys.len(), self.col_keys.len())
    }

    pub fn get(&self, row_key: i32, col_key: i32) -> Option<f64> {
        let r = self.row_keys.binary_search(&row_key).ok()?;
        let c = self.col_keys.binary_search(&col_key).ok()?;
        let v = self.values[[r, c]];
        (!v.is_nan()).then_some(v)
    }

    /// Finite minimum and maximum over all cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Row and column keys of a reading under `granularity`.
pub fn pivot_keys(granularity: TimeGranularity, ts: &chrono::NaiveDateTime) -> (i32, i32) {
    match granularity {
        TimeGranularity::Hour => (ts.hour() as i32, ts.ordinal() as i32),
        TimeGranularity::Day => (ts.day() as i32, ts.month() as i32),
        TimeGranularity::Month => (ts.month() as i32, ts.year()),
    }
}

/// Axis titles `(columns, rows)` for a pivot under `granularity`.
pub fn pivot_axis_titles(granularity: TimeGranularity) -> (&'static str, &'static str) {
    match granularity {
        TimeGranularity::Hour => ("Day of Year", "Hour"),
        TimeGranularity::Day => ("Month", "Day"),
        TimeGranularity::Month => ("Year", "Month"),
    }
}

pub fn pivot_row_label(granularity: TimeGranularity, key: i32) -> String {
    match granularity {
        TimeGranularity::Hour => format!("{:02}:00", key),
        TimeGranularity::Day => key.to_string(),
        TimeGranularity::Month => super::calendar::month_abbr(key as u32).to_string(),
    }
}

pub fn pivot_col_label(granularity: TimeGranularity, key: i32) -> String {
    match granularity {
        TimeGranularity::Day => super::calendar::month_abbr(key as u32).to_string(),
        TimeGranularity::Hour | TimeGranularity::Month => key.to_string(),
    }
}

/// Pivot the series into a mean-aggregated grid.
pub fn pivot(series: &TemperatureSeries, granularity: TimeGranularity) -> PivotTable {
    let mut sums: BTreeMap<(i32, i32), (f64, usize)> = BTreeMap::new();
    for reading in series.iter().filter(|r| r.temperature.is_finite()) {
        let entry = sums.entry(pivot_keys(granularity, &reading.timestamp)).or_insert((0.0, 0));
        entry.0 += reading.temperature;
        entry.1 += 1;
    }

    let mut row_keys: Vec<i32> = sums.keys().map(|(r, _)| *r).collect();
    let mut col_keys: Vec<i32> = sums.keys().map(|(_, c)| *c).collect();
    row_keys.sort_unstable();
    row_keys.dedup();
    col_keys.sort_unstable();
    col_keys.dedup();

    let mut values = Array2::from_elem((row_keys.len(), col_keys.len()), f64::NAN);
    for ((row, col), (sum, count)) in &sums {
        if let (Ok(r), Ok(c)) = (row_keys.binary_search(row), col_keys.binary_search(col)) {
            values[[r, c]] = sum / *count as f64;
        }
    }

    PivotTable {
        row_keys,
        col_keys,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_timestamp;
    use crate::types::Reading;
    use pretty_assertions::assert_eq;

    fn reading(ts: &str, temperature: f64) -> Reading {
        Reading {
            timestamp: parse_timestamp(ts).unwrap(),
            temperature,
        }
    }

    #[test]
    fn test_group_by_hour() {
        let series = TemperatureSeries::new(vec![
            reading("2024-01-01 00:00:00", 1.0),
            reading("2024-01-02 00:00:00", 3.0),
            reading("2024-01-01 05:00:00", 7.0),
        ]);
        let groups = group_values(&series, GroupBy::Hour);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![0, 5]);
        assert_eq!(groups[&0], vec![1.0, 3.0]);
        assert_eq!(group_label(GroupBy::Hour, 5), "05:00");
        assert_eq!(group_label(GroupBy::Month, 12), "Dec");
    }

    #[test]
    fn test_pivot_averages_and_fills_gaps() {
        let series = TemperatureSeries::new(vec![
            reading("2024-01-01 00:00:00", 2.0),
            reading("2024-02-01 00:00:00", 4.0),
            reading("2024-02-01 12:00:00", 6.0),
            reading("2024-02-02 00:00:00", 8.0),
        ]);
        let table = pivot(&series, TimeGranularity::Day);
        assert_eq!(table.row_keys, vec![1, 2]);
        assert_eq!(table.col_keys, vec![1, 2]);
        assert_eq!(table.get(1, 2), Some(5.0));
        assert_eq!(table.get(2, 1), None);
        assert_eq!(table.value_range(), Some((2.0, 8.0)));
    }

    #[test]
    fn test_pivot_by_hour_uses_day_of_year_columns() {
        let series = TemperatureSeries::new(vec![
            reading("2024-03-01 00:00:00", 1.0),
            reading("2024-03-01 23:00:00", 2.0),
        ]);
        let table = pivot(&series, TimeGranularity::Hour);
        assert_eq!(table.shape(), (2, 1));
        assert_eq!(table.col_keys, vec![61]);
        assert_eq!(table.get(23, 61), Some(2.0));
    }

    #[test]
    fn test_pivot_labels() {
        assert_eq!(pivot_row_label(TimeGranularity::Hour, 7), "07:00");
        assert_eq!(pivot_col_label(TimeGranularity::Day, 3), "Mar");
        assert_eq!(pivot_row_label(TimeGranularity::Month, 12), "Dec");
        assert_eq!(pivot_axis_titles(TimeGranularity::Month), ("Year", "Month"));
    }
}
