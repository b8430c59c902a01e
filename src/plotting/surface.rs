use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::colorbar::{Colorbar, Orientation};
use super::params::{FigureParams, OutputParams};
use super::styles::{Colormap, TEXT_COLOR};
use super::{finish, render_to_buffer};
use crate::analysis::calendar::month_abbr;
use crate::analysis::grouping::pivot;
use crate::config::{ChartOptions, Section};
use crate::error::{VizError, VizResult};
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries, TimeGranularity};

#[derive(Debug, Clone, PartialEq)]
struct SurfaceStyle {
    cmap: Colormap,
    rstride: usize,
    cstride: usize,
    alpha: f64,
    linewidth: f64,
    cbar_label: Option<String>,
    cbar_fontsize: f64,
    elevation: f64,
    azimuth: f64,
}

impl SurfaceStyle {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        // type-checked only; BitMapBackend has no antialias switch
        let _antialiased = section.bool("antialiased")?;
        Ok(Self {
            cmap: Colormap::named(section.str("cmap")?)?,
            rstride: section.u32("rstride")?.max(1) as usize,
            cstride: section.u32("cstride")?.max(1) as usize,
            alpha: section.f64("alpha")?,
            linewidth: section.f64("linewidth")?,
            cbar_label: section.opt_str("cbar_label")?.map(str::to_string),
            cbar_fontsize: section.f64("cbar_fontsize")?,
            elevation: section.f64("elevation")?,
            azimuth: section.f64("azimuth")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SurfaceText {
    xlabel: Option<String>,
    ylabel: Option<String>,
    zlabel: Option<String>,
    label_pad: f64,
    title: Option<String>,
    title_fontsize: f64,
    label_fontsize: f64,
    tick_fontsize: f64,
    title_ypos: f64,
}

impl SurfaceText {
    fn from_sections(axis: &Section<'_>, text: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            xlabel: axis.opt_str("xlabel")?.map(str::to_string),
            ylabel: axis.opt_str("ylabel")?.map(str::to_string),
            zlabel: axis.opt_str("zlabel")?.map(str::to_string),
            label_pad: axis.f64("label_pad")?,
            title: text.opt_str("title")?.map(str::to_string),
            title_fontsize: text.f64("title_fontsize")?,
            label_fontsize: text.f64("label_fontsize")?,
            tick_fontsize: text.f64("tick_fontsize")?,
            title_ypos: text.f64("title_ypos")?,
        })
    }
}

/// Temperature over day of year and hour of day as a 3D surface.
///
/// The day runs along plotters' x axis, the hour along z, and temperature is
/// the height (y). `elevation` and `azimuth` are degrees, as for a camera
/// looking at the surface.
pub fn create_3d_surface(series: &TemperatureSeries, year: i32, options: &ChartOptions) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::StaticSurface;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let figure = FigureParams::from_section(&config.section("figure")?)?;
    let style = SurfaceStyle::from_section(&config.section("surface")?)?;
    let text = SurfaceText::from_sections(&config.section("axis")?, &config.section("text")?)?;
    let output = OutputParams::from_section(&config.section("output")?)?;

    let table = pivot(&series.filter_year(year), TimeGranularity::Hour);
    let (lo, hi) = table
        .value_range()
        .ok_or_else(|| VizError::EmptySeries(format!("{} has no readings in {}", KIND, year)))?;

    let days: Vec<usize> = (0..table.col_keys.len()).step_by(style.cstride).collect();
    let hours: Vec<usize> = (0..table.row_keys.len()).step_by(style.rstride).collect();
    let value = |day_idx: usize, hour_idx: usize| {
        let v = table.values[[hour_idx, day_idx]];
        if v.is_finite() {
            v
        } else {
            lo
        }
    };
    let day_max = *table.col_keys.last().unwrap_or(&1) as f64;
    let hour_max = *table.row_keys.last().unwrap_or(&23) as f64;
    let font = options.font_family();

    let rgb = render_to_buffer(&figure, |root| {
        let (width, height) = root.dim_in_pixel();
        let tick_px = figure.pt(text.tick_fontsize);
        let label_px = figure.pt(text.label_fontsize);

        if let Some(title) = &text.title {
            let at = ((width / 2) as i32, (height as f64 * (1.0 - text.title_ypos)) as i32);
            let style = (font, figure.pt(text.title_fontsize))
                .into_font()
                .color(&TEXT_COLOR)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(title.as_str(), at, style))?;
        }

        let (plot_area, cbar_area) = root.split_horizontally((width as f64 * 0.86) as i32);
        let top = (height as f64 * (1.0 - text.title_ypos) + figure.pt(text.title_fontsize)) as i32;
        let plot_area = plot_area.margin(top.max(0) as u32, 0, 0, 0);

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(figure.px(text.label_pad))
            .build_cartesian_3d(1.0..day_max, lo..hi, 0.0..hour_max)?;
        chart.with_projection(|mut pb| {
            pb.pitch = style.elevation.to_radians();
            pb.yaw = style.azimuth.to_radians();
            pb.scale = 0.8;
            pb.into_matrix()
        });

        let day_formatter = |x: &f64| {
            NaiveDate::from_yo_opt(year, x.round().max(1.0) as u32)
                .map(|d| month_abbr(d.month()).to_string())
                .unwrap_or_default()
        };
        let hour_formatter = |z: &f64| format!("{:.0}", z);
        let temp_formatter = |y: &f64| format!("{:.0}", y);
        chart
            .configure_axes()
            .label_style((font, tick_px).into_font().color(&TEXT_COLOR))
            .x_formatter(&day_formatter)
            .y_formatter(&temp_formatter)
            .z_formatter(&hour_formatter)
            .light_grid_style(TEXT_COLOR.mix(0.1))
            .max_light_lines(3)
            .draw()?;

        let shade = |y: &f64| style.cmap.map(*y, lo, hi).mix(style.alpha).filled();
        let x_of = |i: usize| table.col_keys[i] as f64;
        let z_of = |i: usize| table.row_keys[i] as f64;
        chart.draw_series(
            SurfaceSeries::xoz(days.iter().map(|&i| x_of(i)), hours.iter().map(|&i| z_of(i)), |x, z| {
                let day = table.col_keys.binary_search(&(x as i32)).unwrap_or(0);
                let hour = table.row_keys.binary_search(&(z as i32)).unwrap_or(0);
                value(day, hour)
            })
            .style_func(&shade),
        )?;

        if style.linewidth > 0.0 {
            let edge = BLACK.mix(0.25).stroke_width(figure.px(style.linewidth).min(2));
            for &h in &hours {
                let path: Vec<(f64, f64, f64)> = days.iter().map(|&d| (x_of(d), value(d, h), z_of(h))).collect();
                chart.draw_series(std::iter::once(PathElement::new(path, edge)))?;
            }
        }

        let axis_font = (font, label_px)
            .into_font()
            .color(&TEXT_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let labels = [
            (&text.xlabel, (day_max / 2.0, lo, hour_max * 1.25)),
            (&text.ylabel, (day_max * 1.1, lo, hour_max / 2.0)),
            (&text.zlabel, (1.0, hi + (hi - lo) * 0.12, 0.0)),
        ];
        for (label, at) in labels {
            if let Some(label) = label {
                chart.draw_series(std::iter::once(Text::new(label.clone(), at, axis_font.clone())))?;
            }
        }

        let (cw, ch) = cbar_area.dim_in_pixel();
        let cbar_px = figure.pt(style.cbar_fontsize);
        Colorbar {
            cmap: &style.cmap,
            vmin: lo,
            vmax: hi,
            label: style.cbar_label.as_deref(),
            font,
            tick_px: cbar_px,
            label_px: cbar_px,
        }
        .draw(
            &cbar_area,
            ((cw as f64 * 0.05) as i32, (ch as f64 * 0.25) as i32),
            ((cw as f64 * 0.2) as i32, (ch as f64 * 0.75) as i32),
            Orientation::Vertical,
        )?;
        Ok(())
    })?;

    tracing::debug!(chart = %KIND, year, days = days.len(), hours = hours.len(), "surface drawn");
    finish(
        KIND,
        text.title.as_deref().unwrap_or(KIND.name()),
        &figure,
        rgb,
        &output,
        options.wants_display(),
    )
}
