use plotters::prelude::*;

use super::params::{self, FigureParams, GridParams, OutputParams, TextParams};
use super::styles::{tick_style, Marker, GRID_COLOR, TEXT_COLOR};
use super::{draw_dashed_grid, draw_markers, finish, padded, render_to_buffer};
use crate::analysis::grouping::{group_axis_title, group_label, group_values};
use crate::config::{ChartOptions, Section};
use crate::error::{VizError, VizResult};
use crate::types::{ChartArtifact, ChartKind, GroupBy, TemperatureSeries};
use crate::utils::BoxStats;

#[derive(Debug, Clone, PartialEq)]
struct BoxStyle {
    patch_artist: bool,
    show_means: bool,
    show_fliers: bool,
    widths: f64,
    facecolor: RGBColor,
    alpha: f64,
    edgecolor: RGBColor,
    linewidth: f64,
    flier_marker: Marker,
    flier_size: f64,
    flier_color: RGBColor,
    flier_alpha: f64,
}

impl BoxStyle {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            patch_artist: section.bool("patch_artist")?,
            show_means: section.bool("show_means")?,
            show_fliers: section.bool("show_fliers")?,
            widths: section.f64("widths")?,
            facecolor: params::color(section, "facecolor")?,
            alpha: section.f64("alpha")?,
            edgecolor: params::color(section, "edgecolor")?,
            linewidth: section.f64("linewidth")?,
            flier_marker: Marker::parse(section.str("flier_marker")?)?,
            flier_size: section.f64("flier_size")?,
            flier_color: params::color(section, "flier_color")?,
            flier_alpha: section.f64("flier_alpha")?,
        })
    }
}

/// One box per month, day of month or hour of day.
pub fn create_box_plot(
    series: &TemperatureSeries,
    group_by: GroupBy,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::StaticBox;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let figure = FigureParams::from_section(&config.section("figure")?)?;
    let style = BoxStyle::from_section(&config.section("box")?)?;
    let axis = config.section("axis")?;
    let xlabel = axis.opt_str("xlabel")?.unwrap_or(group_axis_title(group_by));
    let ylabel = axis.opt_str("ylabel")?;
    let rotation = axis.f64("rotation")?;
    let grid = GridParams::from_axis(&axis)?;
    let text = TextParams::from_section(&config.section("text")?)?;
    let output = OutputParams::from_section(&config.section("output")?)?;

    let groups: Vec<(u32, BoxStats)> = group_values(series, group_by)
        .into_iter()
        .filter_map(|(key, values)| BoxStats::from_values(&values).map(|stats| (key, stats)))
        .collect();
    if groups.is_empty() {
        return Err(VizError::EmptySeries(format!("{} found no finite readings", KIND)));
    }
    let labels: Vec<String> = groups.iter().map(|(key, _)| group_label(group_by, *key)).collect();

    let (lo, hi) = groups.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, s)| {
        let (mut low, mut high) = (s.whisker_low, s.whisker_high);
        if style.show_fliers {
            low = s.fliers.iter().copied().fold(low, f64::min);
            high = s.fliers.iter().copied().fold(high, f64::max);
        }
        (lo.min(low), hi.max(high))
    });
    let font = options.font_family();
    let n = groups.len();

    let rgb = render_to_buffer(&figure, |root| {
        let tick_px = figure.pt(text.tick_fontsize);
        let label_px = figure.pt(text.label_fontsize);

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(figure.px(12.0))
            .x_label_area_size((tick_px * if rotation.abs() >= 45.0 { 4.0 } else { 1.8 } + label_px * 1.8) as u32)
            .y_label_area_size((tick_px * 3.5 + label_px * 1.8) as u32);
        if let Some(title) = &text.title {
            builder.caption(title, (font, figure.pt(text.title_fontsize)).into_font().color(&TEXT_COLOR));
        }
        let mut chart = builder.build_cartesian_2d(0.5..n as f64 + 0.5, padded(lo, hi, 0.05))?;

        // category ticks sit on whole numbers
        let x_formatter = |x: &f64| {
            let i = x.round();
            if (x - i).abs() > 1e-6 || i < 1.0 {
                return String::new();
            }
            labels.get(i as usize - 1).cloned().unwrap_or_default()
        };
        let y_formatter = |y: &f64| format!("{:.0}", y);
        let mut mesh = chart.configure_mesh();
        mesh.x_labels(n)
            .y_labels(10)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .x_label_style(tick_style(font, tick_px, rotation, &TEXT_COLOR))
            .y_label_style((font, tick_px).into_font().color(&TEXT_COLOR))
            .axis_desc_style((font, label_px).into_font().color(&TEXT_COLOR))
            .axis_style(TEXT_COLOR)
            .light_line_style(TRANSPARENT)
            .x_desc(xlabel);
        if let Some(ylabel) = ylabel {
            mesh.y_desc(ylabel);
        }
        if grid.solid() {
            mesh.bold_line_style(GRID_COLOR.mix(grid.alpha));
        } else {
            mesh.disable_mesh();
        }
        mesh.draw()?;
        draw_dashed_grid(&mut chart, &grid, n, 10)?;

        let edge = style.edgecolor.stroke_width(figure.px(style.linewidth));
        let half = style.widths / 2.0;
        for (i, (_, stats)) in groups.iter().enumerate() {
            let x = (i + 1) as f64;
            let corners = [(x - half, stats.q1), (x + half, stats.q3)];
            if style.patch_artist {
                chart.draw_series(std::iter::once(Rectangle::new(
                    corners,
                    style.facecolor.mix(style.alpha).filled(),
                )))?;
            }
            chart.draw_series(std::iter::once(Rectangle::new(corners, edge)))?;
            chart.draw_series(
                [
                    vec![(x - half, stats.median), (x + half, stats.median)],
                    vec![(x, stats.q1), (x, stats.whisker_low)],
                    vec![(x, stats.q3), (x, stats.whisker_high)],
                    vec![(x - half / 2.0, stats.whisker_low), (x + half / 2.0, stats.whisker_low)],
                    vec![(x - half / 2.0, stats.whisker_high), (x + half / 2.0, stats.whisker_high)],
                ]
                .into_iter()
                .map(|path| PathElement::new(path, edge)),
            )?;

            if style.show_fliers && !stats.fliers.is_empty() {
                let fliers: Vec<(f64, f64)> = stats.fliers.iter().map(|&v| (x, v)).collect();
                let color = style.flier_color.mix(style.flier_alpha).filled();
                draw_markers(&mut chart, &fliers, style.flier_marker, figure.px(style.flier_size / 2.0), color)?;
            }
            if style.show_means {
                let mean_size = figure.px(style.flier_size / 2.0 + 1.0);
                draw_markers(&mut chart, &[(x, stats.mean)], Marker::Triangle, mean_size, GREEN.filled())?;
            }
        }
        Ok(())
    })?;

    tracing::debug!(chart = %KIND, groups = n, ?group_by, "box plot drawn");
    finish(
        KIND,
        text.title.as_deref().unwrap_or(KIND.name()),
        &figure,
        rgb,
        &output,
        options.wants_display(),
    )
}
