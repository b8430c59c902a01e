use plotters::prelude::*;

use super::params::{self, FigureParams, LegendParams, OutputParams, TextParams, TimeAxisParams};
use super::styles::{dash_pattern, dash_runs, legend_position, TEXT_COLOR};
use super::{finish, padded, render_to_buffer, time_chart, TimeFrame};
use crate::config::{ChartOptions, Section};
use crate::error::VizResult;
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries};

#[derive(Debug, Clone, PartialEq)]
struct AreaStyle {
    fill_color: RGBColor,
    alpha: f64,
    linewidth: f64,
    dash: Option<(usize, usize)>,
    edge_color: RGBColor,
}

impl AreaStyle {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            fill_color: params::color(section, "fill_color")?,
            alpha: section.f64("alpha")?,
            linewidth: section.f64("linewidth")?,
            dash: dash_pattern(section.str("linestyle")?)?,
            edge_color: params::color(section, "edge_color")?,
        })
    }
}

/// Filled area under the temperature curve, down to zero.
pub fn create_area_plot(series: &TemperatureSeries, options: &ChartOptions) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::StaticArea;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let figure = FigureParams::from_section(&config.section("figure")?)?;
    let style = AreaStyle::from_section(&config.section("area")?)?;
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
        let mut chart = time_chart(
            root,
            &figure,
            &text,
            &axis,
            font,
            frame,
            0.0..x_end,
            padded(lo.min(0.0), hi.max(0.0), 0.05),
        )?;

        let fill = style.fill_color.mix(style.alpha).filled();
        let area = chart.draw_series(AreaSeries::new(points.iter().copied(), 0.0, fill))?;
        if let Some(label) = &legend.label {
            area.label(label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill));
        }

        let edge = style.edge_color.stroke_width(figure.px(style.linewidth));
        for run in dash_runs(&points, style.dash) {
            chart.draw_series(LineSeries::new(run, edge))?;
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

    tracing::debug!(chart = %KIND, points = points.len(), "area chart drawn");
    finish(
        KIND,
        text.title.as_deref().unwrap_or(KIND.name()),
        &figure,
        rgb,
        &output,
        options.wants_display(),
    )
}
