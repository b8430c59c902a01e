//! Static chart producers.
//!
//! Every producer resolves its configuration once, draws into an in-memory
//! RGB buffer with plotters, and writes `<output.save_path>/<output.filename>.png`
//! when a save path is configured.

pub mod area;
pub mod box_plot;
pub mod calendar;
pub mod colorbar;
pub mod heatmap;
pub mod line;
pub mod params;
pub mod styles;
pub mod surface;


pub use area::create_area_plot;
pub use box_plot::create_box_plot;
pub use calendar::create_calendar_heatmap;
pub use heatmap::create_heatmap;
pub use line::create_line_plot;
pub use surface::create_3d_surface;

use std::fs;
use std::ops::Range;

use chrono::{Duration, NaiveDateTime};
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::VizResult;
use crate::types::{ArtifactBody, ChartArtifact, ChartKind};
use params::{FigureParams, GridParams, OutputParams, TextParams, TimeAxisParams};
use styles::{dash_runs, tick_style, Marker, GRID_COLOR, TEXT_COLOR};

pub(crate) type Canvas<'b> = DrawingArea<BitMapBackend<'b>, Shift>;
pub(crate) type Chart2d<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Draw onto a white canvas of the figure's pixel size and return its RGB buffer.
pub(crate) fn render_to_buffer<F>(figure: &FigureParams, draw: F) -> VizResult<Vec<u8>>
where
    F: FnOnce(&Canvas<'_>) -> VizResult<()>,
{
    let (width, height) = figure.pixels();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(buffer)
}

/// Package a rendered buffer and write it as PNG if the output section asks for it.
///
/// When `save_dpi` differs from the figure dpi the written image is resampled
/// to the save resolution; the in-memory artifact keeps the figure resolution.
pub(crate) fn finish(
    kind: ChartKind,
    title: &str,
    figure: &FigureParams,
    rgb: Vec<u8>,
    output: &OutputParams,
    show: bool,
) -> VizResult<ChartArtifact> {
    let (width, height) = figure.pixels();
    let path = match &output.save_path {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}.{}", output.filename, kind.flavor().extension()));
            let save_figure = FigureParams {
                dpi: output.save_dpi.unwrap_or(figure.dpi),
                ..*figure
            };
            let (save_width, save_height) = save_figure.pixels();
            if (save_width, save_height) == (width, height) {
                image::save_buffer(&path, &rgb, width, height, image::ExtendedColorType::Rgb8)?;
            } else {
                let img = image::RgbImage::from_raw(width, height, rgb.clone()).ok_or_else(|| {
                    crate::error::VizError::Render(format!("{} buffer does not match {}x{}", kind, width, height))
                })?;
                image::imageops::resize(&img, save_width, save_height, image::imageops::FilterType::Triangle)
                    .save(&path)?;
            }
            tracing::info!(chart = %kind, path = %path.display(), "chart saved");
            Some(path)
        }
        None => None,
    };

    Ok(ChartArtifact {
        kind,
        title: title.to_string(),
        path,
        show,
        body: ArtifactBody::Raster { width, height, rgb },
    })
}

/// Maps timestamps onto a fractional-day x axis starting at the first reading.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TimeFrame {
    origin: NaiveDateTime,
}

impl TimeFrame {
    pub fn new(origin: NaiveDateTime) -> Self {
        Self { origin }
    }

    pub fn x(&self, ts: &NaiveDateTime) -> f64 {
        (*ts - self.origin).num_seconds() as f64 / 86_400.0
    }

    pub fn label(&self, x: f64, format: &str) -> String {
        let ts = self.origin + Duration::seconds((x * 86_400.0).round() as i64);
        ts.format(format).to_string()
    }
}

/// Pad a value range by `fraction` of its span on both ends.
pub(crate) fn padded(lo: f64, hi: f64, fraction: f64) -> Range<f64> {
    let span = (hi - lo).abs().max(1.0);
    (lo - span * fraction)..(hi + span * fraction)
}

/// Build the chart frame and mesh for a time-series chart.
pub(crate) fn time_chart<'a, 'b>(
    root: &'a Canvas<'b>,
    figure: &FigureParams,
    text: &TextParams,
    axis: &TimeAxisParams,
    font: &str,
    frame: TimeFrame,
    x_range: Range<f64>,
    y_range: Range<f64>,
) -> VizResult<Chart2d<'a, 'b>> {
    let tick_px = figure.pt(text.tick_fontsize);
    let label_px = figure.pt(text.label_fontsize);
    let rotated = axis.rotation.abs() >= 45.0;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(figure.px(12.0))
        .x_label_area_size((tick_px * if rotated { 5.0 } else { 1.8 } + label_px * 1.8) as u32)
        .y_label_area_size((tick_px * 3.5 + label_px * 1.8) as u32);
    if let Some(title) = &text.title {
        builder.caption(title, (font, figure.pt(text.title_fontsize)).into_font().color(&TEXT_COLOR));
    }
    let mut chart = builder.build_cartesian_2d(x_range, y_range)?;

    let date_format = axis.date_format.clone();
    let x_formatter = move |x: &f64| frame.label(*x, &date_format);
    let y_formatter = |y: &f64| format!("{:.0}", y);

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(12)
        .y_labels(10)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .x_label_style(tick_style(font, tick_px, axis.rotation, &TEXT_COLOR))
        .y_label_style((font, tick_px).into_font().color(&TEXT_COLOR))
        .axis_desc_style((font, label_px).into_font().color(&TEXT_COLOR))
        .axis_style(TEXT_COLOR)
        .light_line_style(TRANSPARENT);
    if let Some(xlabel) = &axis.xlabel {
        mesh.x_desc(xlabel.as_str());
    }
    if let Some(ylabel) = &axis.ylabel {
        mesh.y_desc(ylabel.as_str());
    }
    if axis.grid.solid() {
        mesh.bold_line_style(GRID_COLOR.mix(axis.grid.alpha));
    } else {
        mesh.disable_mesh();
    }
    mesh.draw()?;
    draw_dashed_grid(&mut chart, &axis.grid, 12, 10)?;

    Ok(chart)
}

const GRID_DASH_STEPS: usize = 96;

/// Draw dashed grid lines at the mesh's bold key points.
///
/// No-op unless the grid is shown with a dash pattern; the solid case is
/// left to the mesh.
pub(crate) fn draw_dashed_grid(
    chart: &mut Chart2d<'_, '_>,
    grid: &GridParams,
    x_labels: usize,
    y_labels: usize,
) -> VizResult<()> {
    let Some(pattern) = grid.dash.filter(|_| grid.show) else {
        return Ok(());
    };
    let (x_range, y_range) = (chart.x_range(), chart.y_range());
    let style = GRID_COLOR.mix(grid.alpha).stroke_width(1);
    let sample = |from: (f64, f64), to: (f64, f64)| -> Vec<(f64, f64)> {
        (0..=GRID_DASH_STEPS)
            .map(|i| {
                let f = i as f64 / GRID_DASH_STEPS as f64;
                (from.0 + (to.0 - from.0) * f, from.1 + (to.1 - from.1) * f)
            })
            .collect()
    };

    let mut lines = Vec::new();
    for x in RangedCoordf64::from(x_range.clone()).key_points(x_labels) {
        lines.push(sample((x, y_range.start), (x, y_range.end)));
    }
    for y in RangedCoordf64::from(y_range).key_points(y_labels) {
        lines.push(sample((x_range.start, y), (x_range.end, y)));
    }
    for line in lines {
        for run in dash_runs(&line, Some(pattern)) {
            chart.draw_series(LineSeries::new(run, style))?;
        }
    }
    Ok(())
}

/// Scatter `marker` shapes of `size` pixels over `points`.
pub(crate) fn draw_markers(
    chart: &mut Chart2d<'_, '_>,
    points: &[(f64, f64)],
    marker: Marker,
    size: u32,
    style: ShapeStyle,
) -> VizResult<()> {
    let half = (size as i32).max(1);
    match marker {
        Marker::Circle => {
            chart.draw_series(points.iter().map(|&p| Circle::new(p, size, style)))?;
        }
        Marker::Square => {
            chart.draw_series(
                points
                    .iter()
                    .map(|&p| EmptyElement::at(p) + Rectangle::new([(-half, -half), (half, half)], style)),
            )?;
        }
        Marker::Triangle => {
            chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, size, style)))?;
        }
        Marker::Cross => {
            chart.draw_series(points.iter().map(|&p| Cross::new(p, size, style)))?;
        }
    }
    Ok(())
}
