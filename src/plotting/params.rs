//! Parameter groups read from a resolved static-chart configuration.
//!
//! Each struct pulls exactly the leaves its renderer uses; a missing or
//! mistyped leaf fails here with its full dotted path.

use std::path::PathBuf;

use plotters::style::RGBColor;

use super::styles::{dash_pattern, parse_color};
use crate::analysis::calendar::validate_date_format;
use crate::config::Section;
use crate::error::{VizError, VizResult};

/// Canvas size and resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureParams {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
}

impl FigureParams {
    pub fn from_section(section: &Section<'_>) -> VizResult<Self> {
        let (width_in, height_in) = section.f64_pair("figsize")?;
        let dpi = section.f64("dpi")?;
        if width_in <= 0.0 || height_in <= 0.0 || dpi <= 0.0 {
            return Err(VizError::invalid("figure", "figsize and dpi must be positive"));
        }
        Ok(Self {
            width_in,
            height_in,
            dpi,
        })
    }

    pub fn pixels(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Points to pixels at this figure's resolution.
    pub fn pt(&self, points: f64) -> f64 {
        (points * self.dpi / 72.0).max(1.0)
    }

    /// Points to whole pixels, never below one.
    pub fn px(&self, points: f64) -> u32 {
        self.pt(points).round() as u32
    }
}

/// Title and font sizes of the `text` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TextParams {
    pub title: Option<String>,
    pub title_fontsize: f64,
    pub label_fontsize: f64,
    pub tick_fontsize: f64,
}

impl TextParams {
    pub fn from_section(section: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            title: section.opt_str("title")?.map(str::to_string),
            title_fontsize: section.f64("title_fontsize")?,
            label_fontsize: section.f64("label_fontsize")?,
            tick_fontsize: section.f64("tick_fontsize")?,
        })
    }
}

/// Grid visibility and style.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub show: bool,
    pub alpha: f64,
    pub dash: Option<(usize, usize)>,
}

impl GridParams {
    /// Reads `grid` and, when present, the `grid_style` child of an axis section.
    pub fn from_axis(axis: &Section<'_>) -> VizResult<Self> {
        let show = axis.bool("grid")?;
        let (alpha, dash) = match axis.get("grid_style") {
            Some(_) => {
                let style = axis.child("grid_style")?;
                (style.f64("alpha")?, dash_pattern(style.str("linestyle")?)?)
            }
            None => (0.5, None),
        };
        Ok(Self { show, alpha, dash })
    }

    /// Shown without a dash pattern, so the mesh can draw it.
    pub fn solid(&self) -> bool {
        self.show && self.dash.is_none()
    }
}

/// Time-axis labelling shared by the area and line charts.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxisParams {
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub date_format: String,
    pub rotation: f64,
    pub grid: GridParams,
}

impl TimeAxisParams {
    pub fn from_section(section: &Section<'_>) -> VizResult<Self> {
        let date_format = section.str("date_format")?;
        validate_date_format("axis.date_format", date_format)?;
        Ok(Self {
            xlabel: section.opt_str("xlabel")?.map(str::to_string),
            ylabel: section.opt_str("ylabel")?.map(str::to_string),
            date_format: date_format.to_string(),
            rotation: section.f64("rotation")?,
            grid: GridParams::from_axis(section)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendParams {
    pub show: bool,
    pub label: Option<String>,
    pub loc: String,
    pub fontsize: f64,
}

impl LegendParams {
    pub fn from_section(section: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            show: section.bool("show")?,
            label: section.opt_str("label")?.map(str::to_string),
            loc: section.str("loc")?.to_string(),
            fontsize: section.f64("fontsize")?,
        })
    }
}

/// Where the PNG goes. `save_path: None` renders without writing.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputParams {
    pub save_path: Option<PathBuf>,
    pub filename: String,
    pub save_dpi: Option<f64>,
}

impl OutputParams {
    pub fn from_section(section: &Section<'_>) -> VizResult<Self> {
        let filename = section.str("filename")?;
        if filename.is_empty() {
            return Err(VizError::invalid("output.filename", "must not be empty"));
        }
        Ok(Self {
            save_path: section.opt_str("save_path")?.map(PathBuf::from),
            filename: filename.to_string(),
            save_dpi: section.opt_f64("save_dpi")?,
        })
    }
}

/// A colour leaf.
pub fn color(section: &Section<'_>, key: &str) -> VizResult<RGBColor> {
    parse_color(section.str(key)?)
}
