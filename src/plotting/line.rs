use plotters::prelude::*;

use super::params::{self, FigureParams, LegendParams, OutputParams, TextParams, TimeAxisParams};
use super::styles::{dash_pattern, dash_runs, legend_position, Marker, TEXT_COLOR};
use super::{draw_markers, finish, padded, render_to_buffer, time_chart, TimeFrame};
use crate::config::{ChartOptions, Section};
use crate::error::VizResult;
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries};

#[derive(Debug, Clone, PartialEq)]
struct LineStyle {
    color: RGBColor,
    dash: Option<(usize, usize)>,
    linewidth: f64,
    alpha: f64,
    marker: Option<Marker>,
    markersize: f64,
}

impl LineStyle {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            color: params::color(section, "color")?,
            dash: dash_pattern(section.str("linestyle")?)?,
            linewidth: section.f64("linewidth")?,
            alpha: section.f64("alpha")?,
            marker: section.opt_str("marker")?.map(Marker::parse).transpose()?,
            markersize: section.f64("markersize")?,
        })
    }
}

/// Hourly temperature as a line over the date axis.
pub fn create_line_plot(series: &TemperatureSeries, options: &ChartOptions) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::StaticLine;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let figure = FigureParams::from_section(&config.section("figure")?)?;
    let style = LineStyle::from_section(&config.section("line")?)?;
    let axis = TimeAxisParams::from_section(&config.section("axis")?)?;
    let text = TextParams::from_section(&config.section("text")?)?;
    let legend = LegendParams::from_section(&config.section("legend")?)?;
    let output = OutputParams::from_section(&config.section("output")?)?;
    let legend_pos = legend_position(&legend.loc)?;

    let frame = TimeFrame::new(series.readings[0].timestamp);
    let points: Vec<(f64, f64)> = series
        .iter()
        .filter(|r| r.temperature.is_finite())
        .map(|r| (frame.x(&r.timestamp), r.temperature))
        .collect();
    let (lo, hi) = series.value_range().unwrap_or((0.0, 1.0));
    let x_end = points.last().map(|p| p.0).unwrap_or(1.0).max(1.0);
    let font = options.font_family();

    let rgb = render_to_buffer(&figure, |root| {
        let mut chart = time_chart(root, &figure, &text, &axis, font, frame, 0.0..x_end, padded(lo, hi, 0.05))?;

        let stroke = style.color.mix(style.alpha).stroke_width(figure.px(style.linewidth));
        for (i, run) in dash_runs(&points, style.dash).into_iter().enumerate() {
            let drawn = chart.draw_series(LineSeries::new(run, stroke))?;
            if i == 0 {
                if let Some(label) = &legend.label {
                    drawn
                        .label(label.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
                }
            }
        }

        if let Some(marker) = style.marker {
            let size = figure.px(style.markersize / 2.0);
            draw_markers(&mut chart, &points, marker, size, style.color.mix(style.alpha).filled())?;
        }

        if legend.show && legend.label.is_some() {
            chart
                .configure_series_labels()
                .position(legend_pos)
                .label_font((font, figure.pt(legend.fontsize)).into_font().color(&TEXT_COLOR))
                .background_style(WHITE.mix(0.8))
                .border_style(TEXT_COLOR)
                .draw()?;
        }
        Ok(())
    })?;

    finish(
        KIND,
        text.title.as_deref().unwrap_or(KIND.name()),
        &figure,
        rgb,
        &output,
        options.wants_display(),
    )
}
