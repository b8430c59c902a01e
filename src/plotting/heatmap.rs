use plotters::prelude::*;

use super::colorbar::{Colorbar, Orientation};
use super::params::{FigureParams, GridParams, OutputParams, TextParams};
use super::styles::{tick_style, Colormap, GRID_COLOR, TEXT_COLOR};
use super::{draw_dashed_grid, finish, render_to_buffer};
use crate::analysis::grouping::{pivot, pivot_axis_titles, pivot_col_label, pivot_row_label};
use crate::config::{ChartOptions, Section};
use crate::error::{VizError, VizResult};
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries, TimeGranularity};

#[derive(Debug, Clone, PartialEq)]
struct HeatmapStyle {
    cmap: Colormap,
    equal_aspect: bool,
    vmin: f64,
    vmax: f64,
    cbar_label: Option<String>,
}

impl HeatmapStyle {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        let colors = section.str_list("cmap_colors")?;
        let cmap = Colormap::from_colors(colors.as_slice(), section.u32("cmap_levels")? as usize)?;
        let equal_aspect = match section.str("aspect_ratio")? {
            "auto" => false,
            "equal" => true,
            other => {
                return Err(VizError::invalid(
                    "heatmap.aspect_ratio",
                    format!("`{}` must be auto or equal", other),
                ))
            }
        };
        match section.str("interpolation")? {
            "nearest" | "none" | "antialiased" => {}
            other => tracing::warn!(interpolation = other, "only nearest-cell drawing is supported"),
        }
        Ok(Self {
            cmap,
            equal_aspect,
            vmin: section.f64("vmin")?,
            vmax: section.f64("vmax")?,
            cbar_label: section.opt_str("cbar_label")?.map(str::to_string),
        })
    }
}

/// Mean-temperature grid, rows and columns chosen by `granularity`.
pub fn create_heatmap(
    series: &TemperatureSeries,
    granularity: TimeGranularity,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::StaticHeatmap;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let figure = FigureParams::from_section(&config.section("figure")?)?;
    let style = HeatmapStyle::from_section(&config.section("heatmap")?)?;
    let axis = config.section("axis")?;
    let (default_x, default_y) = pivot_axis_titles(granularity);
    let xlabel = axis.opt_str("xlabel")?.unwrap_or(default_x);
    let ylabel = axis.opt_str("ylabel")?.unwrap_or(default_y);
    let x_rotation = axis.f64("x_rotation")?;
    let grid = GridParams::from_axis(&axis)?;
    let text = TextParams::from_section(&config.section("text")?)?;
    let output = OutputParams::from_section(&config.section("output")?)?;

    let table = pivot(series, granularity);
    let (rows, cols) = table.shape();
    let col_labels: Vec<String> = table.col_keys.iter().map(|&k| pivot_col_label(granularity, k)).collect();
    let row_labels: Vec<String> = table.row_keys.iter().map(|&k| pivot_row_label(granularity, k)).collect();
    let font = options.font_family();

    let rgb = render_to_buffer(&figure, |root| {
        let (width, height) = root.dim_in_pixel();
        let tick_px = figure.pt(text.tick_fontsize);
        let label_px = figure.pt(text.label_fontsize);
        let (plot_area, cbar_area) = root.split_horizontally((width as f64 * 0.88) as i32);

        let x_area = (tick_px * if x_rotation.abs() >= 45.0 { 5.0 } else { 1.8 } + label_px * 1.8) as u32;
        let y_area = (tick_px * 4.0 + label_px * 1.8) as u32;
        let margin = figure.px(12.0);

        let mut builder = ChartBuilder::on(&plot_area);
        builder.margin(margin).x_label_area_size(x_area).y_label_area_size(y_area);
        if style.equal_aspect {
            let (pw, ph) = plot_area.dim_in_pixel();
            let cell = (pw.saturating_sub(y_area + 2 * margin) as f64 / cols as f64)
                .min(ph.saturating_sub(x_area + 2 * margin) as f64 / rows as f64);
            let spare = pw as f64 - (cell * cols as f64 + (y_area + 2 * margin) as f64);
            builder.margin_right(margin + spare.max(0.0) as u32);
        }
        if let Some(title) = &text.title {
            builder.caption(title, (font, figure.pt(text.title_fontsize)).into_font().color(&TEXT_COLOR));
        }
        let mut chart = builder.build_cartesian_2d(0.0..cols as f64, 0.0..rows as f64)?;

        // a label sits on the lower-left edge of its cell; the first row is drawn on top
        let label_at = |v: f64, labels: &[String], flip: bool| {
            let i = v.round();
            if (v - i).abs() > 1e-6 || i < 0.0 || i as usize >= labels.len() {
                return String::new();
            }
            let i = if flip { labels.len() - 1 - i as usize } else { i as usize };
            labels[i].clone()
        };
        let x_formatter = |x: &f64| label_at(*x, &col_labels, false);
        let y_formatter = |y: &f64| label_at(*y, &row_labels, true);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(cols.min(24))
            .y_labels(rows.min(31))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_label_style(tick_style(font, tick_px, x_rotation, &TEXT_COLOR))
            .y_label_style((font, tick_px).into_font().color(&TEXT_COLOR))
            .axis_desc_style((font, label_px).into_font().color(&TEXT_COLOR))
            .axis_style(TEXT_COLOR)
            .x_desc(xlabel)
            .y_desc(ylabel)
            .light_line_style(TRANSPARENT);
        if grid.solid() {
            mesh.bold_line_style(GRID_COLOR.mix(grid.alpha));
        } else {
            mesh.disable_mesh();
        }
        mesh.draw()?;
        draw_dashed_grid(&mut chart, &grid, cols.min(24), rows.min(31))?;

        chart.draw_series(table.values.indexed_iter().filter(|(_, v)| v.is_finite()).map(|((r, c), v)| {
            let color = style.cmap.map(*v, style.vmin, style.vmax);
            let y = (rows - 1 - r) as f64;
            Rectangle::new([(c as f64, y), (c as f64 + 1.0, y + 1.0)], color.filled())
        }))?;

        let (cw, _) = cbar_area.dim_in_pixel();
        let top = (height as f64 * 0.12) as i32;
        let bottom = height as i32 - x_area as i32 - margin as i32;
        let left = (cw as f64 * 0.05) as i32;
        Colorbar {
            cmap: &style.cmap,
            vmin: style.vmin,
            vmax: style.vmax,
            label: style.cbar_label.as_deref(),
            font,
            tick_px,
            label_px,
        }
        .draw(&cbar_area, (left, top), (left + (cw as f64 * 0.15) as i32, bottom), Orientation::Vertical)?;
        Ok(())
    })?;

    tracing::debug!(chart = %KIND, rows, cols, ?granularity, "heatmap drawn");
    finish(
        KIND,
        text.title.as_deref().unwrap_or(KIND.name()),
        &figure,
        rgb,
        &output,
        options.wants_display(),
    )
}
