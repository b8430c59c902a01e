//! # Common Types
//!
//! Types shared across the crate: the hourly temperature series every chart
//! consumes, the catalogue of chart kinds, and the categorical arguments some
//! producers take.

use chrono::{Datelike, NaiveDateTime};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{VizError, VizResult};

/// One hourly observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
}

/// An ordered series of readings.
///
/// Producers never mutate the series; every auxiliary field (day of year,
/// hour, month, ISO week...) is derived from the timestamps on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureSeries {
    pub readings: Vec<Reading>,
}

impl TemperatureSeries {
    pub fn new(mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.timestamp);
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.temperature).collect()
    }

    /// Readings whose timestamp falls in `year`.
    pub fn filter_year(&self, year: i32) -> TemperatureSeries {
        TemperatureSeries {
            readings: self
                .readings
                .iter()
                .filter(|r| r.timestamp.year() == year)
                .copied()
                .collect(),
        }
    }

    /// Minimum and maximum temperature, ignoring NaN. `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.readings.iter().map(|r| r.temperature).filter(|v| v.is_finite());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub(crate) fn require_data(&self, chart: ChartKind) -> VizResult<()> {
        if self.is_empty() {
            return Err(VizError::EmptySeries(format!("{} received no readings", chart)));
        }
        Ok(())
    }
}

/// Rendering target of a chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Raster image written as PNG.
    Static,
    /// Self-contained HTML document.
    Interactive,
}

impl Flavor {
    pub fn extension(self) -> &'static str {
        match self {
            Flavor::Static => "png",
            Flavor::Interactive => "html",
        }
    }
}

/// The ten supported visualizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartKind {
    StaticArea,
    StaticBox,
    StaticCalendar,
    StaticHeatmap,
    StaticLine,
    StaticSurface,
    InteractiveCalendar,
    InteractiveHeatmap,
    InteractiveLine,
    InteractiveSurface,
}

impl ChartKind {
    pub const ALL: [ChartKind; 10] = [
        ChartKind::StaticArea,
        ChartKind::StaticBox,
        ChartKind::StaticCalendar,
        ChartKind::StaticHeatmap,
        ChartKind::StaticLine,
        ChartKind::StaticSurface,
        ChartKind::InteractiveCalendar,
        ChartKind::InteractiveHeatmap,
        ChartKind::InteractiveLine,
        ChartKind::InteractiveSurface,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::StaticArea => "static-area",
            ChartKind::StaticBox => "static-box",
            ChartKind::StaticCalendar => "static-calendar",
            ChartKind::StaticHeatmap => "static-heatmap",
            ChartKind::StaticLine => "static-line",
            ChartKind::StaticSurface => "static-surface",
            ChartKind::InteractiveCalendar => "interactive-calendar",
            ChartKind::InteractiveHeatmap => "interactive-heatmap",
            ChartKind::InteractiveLine => "interactive-line",
            ChartKind::InteractiveSurface => "interactive-surface",
        }
    }

    pub fn flavor(self) -> Flavor {
        match self {
            ChartKind::StaticArea
            | ChartKind::StaticBox
            | ChartKind::StaticCalendar
            | ChartKind::StaticHeatmap
            | ChartKind::StaticLine
            | ChartKind::StaticSurface => Flavor::Static,
            _ => Flavor::Interactive,
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ChartKind::ALL.iter().map(|k| k.name()).collect();
                VizError::invalid("chart kind", format!("`{}` is not one of {}", s, names.join(", ")))
            })
    }
}

/// Rendered content of a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactBody {
    /// Tightly packed RGB8 pixels.
    Raster { width: u32, height: u32, rgb: Vec<u8> },
    Html(String),
}

/// What a producer hands back: the rendered chart, where it was written, and
/// whether the caller asked to see it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    pub title: String,
    pub path: Option<PathBuf>,
    pub show: bool,
    pub body: ArtifactBody,
}

impl ChartArtifact {
    pub fn is_raster(&self) -> bool {
        matches!(self.body, ArtifactBody::Raster { .. })
    }
}

/// Grouping used by the box chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    Month,
    Day,
    Hour,
}

impl FromStr for GroupBy {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(GroupBy::Month),
            "day" => Ok(GroupBy::Day),
            "hour" => Ok(GroupBy::Hour),
            other => Err(VizError::invalid(
                "group_by",
                format!("`{}` must be one of month/day/hour", other),
            )),
        }
    }
}

/// Row/column layout of the grid heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeGranularity {
    /// Hour of day (rows) by day of year (columns).
    Hour,
    /// Day of month (rows) by month (columns).
    Day,
    /// Month (rows) by year (columns).
    Month,
}

impl FromStr for TimeGranularity {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(TimeGranularity::Hour),
            "day" => Ok(TimeGranularity::Day),
            "month" => Ok(TimeGranularity::Month),
            other => Err(VizError::invalid(
                "time_granularity",
                format!("`{}` must be one of hour/day/month", other),
            )),
        }
    }
}
