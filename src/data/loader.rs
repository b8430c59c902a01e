use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{VizError, VizResult};
use crate::types::{Reading, TemperatureSeries};

pub const TIME_COLUMN: &str = "timestamp";
pub const VALUE_COLUMN: &str = "temperature";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct CsvRow {
    timestamp: String,
    temperature: f64,
}

/// Accepts `2024-03-01 00:00:00`, `2024-03-01T00:00:00` and a bare `2024-03-01`.
pub fn parse_timestamp(raw: &str) -> VizResult<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        })
        .map_err(|_| VizError::Timestamp(raw.to_string()))
}

/// Write the series as `timestamp,temperature` rows.
pub fn write_csv<W: Write>(series: &TemperatureSeries, writer: W) -> VizResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for reading in series.iter() {
        writer.serialize(CsvRow {
            timestamp: reading.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            temperature: reading.temperature,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_csv(series: &TemperatureSeries, path: impl AsRef<Path>) -> VizResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    write_csv(series, fs::File::create(path)?)?;
    tracing::info!(path = %path.display(), rows = series.len(), "data saved");
    Ok(())
}

/// Read a series from delimited text, locating the time and value columns by header name.
pub fn read_csv<R: Read>(reader: R, time_col: &str, value_col: &str) -> VizResult<TemperatureSeries> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| VizError::MissingColumn(name.to_string()))
    };
    let time_idx = position(time_col)?;
    let value_idx = position(value_col)?;

    let mut readings = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw_time = record.get(time_idx).ok_or_else(|| VizError::MissingColumn(time_col.to_string()))?;
        let raw_value = record.get(value_idx).ok_or_else(|| VizError::MissingColumn(value_col.to_string()))?;
        let temperature = if raw_value.trim().is_empty() {
            f64::NAN
        } else {
            raw_value
                .trim()
                .parse::<f64>()
                .map_err(|e| VizError::invalid(value_col, format!("`{}`: {}", raw_value, e)))?
        };
        readings.push(Reading {
            timestamp: parse_timestamp(raw_time)?,
            temperature,
        });
    }

    Ok(TemperatureSeries::new(readings))
}

pub fn load_csv(path: impl AsRef<Path>) -> VizResult<TemperatureSeries> {
    load_csv_with_columns(path, TIME_COLUMN, VALUE_COLUMN)
}

pub fn load_csv_with_columns(path: impl AsRef<Path>, time_col: &str, value_col: &str) -> VizResult<TemperatureSeries> {
    let path = path.as_ref();
    let series = read_csv(fs::File::open(path)?, time_col, value_col)?;
    tracing::debug!(path = %path.display(), rows = series.len(), "data loaded");
    Ok(series)
}
