use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::colorbar::{Colorbar, Orientation};
use super::params::{self, FigureParams, OutputParams};
use super::styles::{Colormap, TEXT_COLOR};
use super::{finish, render_to_buffer};
use crate::analysis::calendar::{dates_of_year, month_abbr, weekday_abbr, CalendarCell};
use crate::config::{ChartOptions, Section};
use crate::error::{VizError, VizResult};
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries};
use crate::utils::resample_daily_mean;

const EMPTY_CELL: RGBColor = RGBColor(235, 235, 235);

#[derive(Debug, Clone, PartialEq)]
struct CalendarStyle {
    cmap: Colormap,
    vmin: f64,
    vmax: f64,
    show_date: bool,
    cbar_label: Option<String>,
    cbar_fontsize: f64,
    /// `[left, bottom, width, height]` as fractions of the figure, origin bottom-left.
    cbar_pos: [f64; 4],
}

impl CalendarStyle {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        let cbar_pos = match section.f64_list("cbar_pos")?.as_slice() {
            [left, bottom, width, height] => [*left, *bottom, *width, *height],
            _ => {
                return Err(VizError::ConfigType {
                    path: "heatmap.cbar_pos".to_string(),
                    expected: "four numbers",
                })
            }
        };
        Ok(Self {
            cmap: Colormap::named(section.str("cmap")?)?,
            vmin: section.f64("vmin")?,
            vmax: section.f64("vmax")?,
            show_date: section.bool("show_date")?,
            cbar_label: section.opt_str("cbar_label")?.map(str::to_string),
            cbar_fontsize: section.f64("cbar_fontsize")?,
            cbar_pos,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CalendarText {
    month_fontsize: f64,
    weekday_fontsize: f64,
    date_fontsize: f64,
    date_color: RGBColor,
}

impl CalendarText {
    fn from_section(section: &Section<'_>) -> VizResult<Self> {
        Ok(Self {
            month_fontsize: section.f64("month_fontsize")?,
            weekday_fontsize: section.f64("weekday_fontsize")?,
            date_fontsize: section.f64("date_fontsize")?,
            date_color: params::color(section, "date_color")?,
        })
    }
}

/// Daily-mean calendar for one year: twelve month blocks of weekday rows.
pub fn create_calendar_heatmap(
    series: &TemperatureSeries,
    year: i32,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::StaticCalendar;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let figure = FigureParams::from_section(&config.section("figure")?)?;
    let style = CalendarStyle::from_section(&config.section("heatmap")?)?;
    let text = CalendarText::from_section(&config.section("text")?)?;
    let output = OutputParams::from_section(&config.section("output")?)?;

    let daily: HashMap<NaiveDate, f64> = resample_daily_mean(&series.filter_year(year))
        .iter()
        .map(|r| (r.timestamp.date(), r.temperature))
        .collect();
    if daily.is_empty() {
        return Err(VizError::EmptySeries(format!("{} has no readings in {}", KIND, year)));
    }
    let cells: Vec<CalendarCell> = dates_of_year(year).into_iter().map(CalendarCell::of).collect();
    let font = options.font_family();

    let rgb = render_to_buffer(&figure, |root| {
        let (width, height) = root.dim_in_pixel();
        let (w, h) = (width as f64, height as f64);
        let [cb_left, cb_bottom, cb_width, cb_height] = style.cbar_pos;
        let cbar_top = h * (1.0 - cb_bottom - cb_height);

        let weekday_px = figure.pt(text.weekday_fontsize);
        let month_px = figure.pt(text.month_fontsize);
        let left = weekday_px * 3.0;
        let top = month_px * 2.5;
        let grid_w = w - left - weekday_px;
        let grid_h = cbar_top - top - month_px;
        let columns = CalendarCell::year_columns() as f64;
        let cell = (grid_w / columns).min(grid_h / 7.0).max(1.0);
        // centre the grid horizontally
        let x0 = left + (grid_w - cell * columns).max(0.0) / 2.0;
        let y0 = top;

        let date_font = (font, figure.pt(text.date_fontsize))
            .into_font()
            .color(&text.date_color)
            .pos(Pos::new(HPos::Center, VPos::Center));
        for c in &cells {
            let cx = x0 + c.column as f64 * cell;
            let cy = y0 + c.weekday as f64 * cell;
            let fill = daily
                .get(&c.date)
                .map(|t| style.cmap.map(*t, style.vmin, style.vmax))
                .unwrap_or(EMPTY_CELL);
            let corners = [(cx as i32, cy as i32), ((cx + cell) as i32, (cy + cell) as i32)];
            root.draw(&Rectangle::new(corners, fill.filled()))?;
            root.draw(&Rectangle::new(corners, WHITE.stroke_width(1)))?;
            if style.show_date {
                let centre = ((cx + cell / 2.0) as i32, (cy + cell / 2.0) as i32);
                root.draw(&Text::new(c.date.day().to_string(), centre, date_font.clone()))?;
            }
        }

        let month_font = (font, month_px)
            .into_font()
            .color(&TEXT_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        for month in 1..=12u32 {
            let block = (month - 1) * CalendarCell::MONTH_COLUMNS;
            let centre_x = x0 + (block as f64 + (CalendarCell::MONTH_COLUMNS - 1) as f64 / 2.0) * cell;
            let at = (centre_x as i32, (y0 - month_px * 0.5) as i32);
            root.draw(&Text::new(month_abbr(month), at, month_font.clone()))?;
        }

        let weekday_font = (font, weekday_px)
            .into_font()
            .color(&TEXT_COLOR)
            .pos(Pos::new(HPos::Right, VPos::Center));
        for weekday in 0..7u32 {
            let at = ((x0 - weekday_px * 0.5) as i32, (y0 + (weekday as f64 + 0.5) * cell) as i32);
            root.draw(&Text::new(weekday_abbr(weekday), at, weekday_font.clone()))?;
        }

        let bar_from = ((w * cb_left) as i32, cbar_top as i32);
        let bar_to = ((w * (cb_left + cb_width)) as i32, (h * (1.0 - cb_bottom)) as i32);
        let cbar_px = figure.pt(style.cbar_fontsize);
        Colorbar {
            cmap: &style.cmap,
            vmin: style.vmin,
            vmax: style.vmax,
            label: style.cbar_label.as_deref(),
            font,
            tick_px: cbar_px,
            label_px: cbar_px,
        }
        .draw(root, bar_from, bar_to, Orientation::Horizontal)?;
        Ok(())
    })?;

    tracing::debug!(chart = %KIND, year, days = daily.len(), "calendar heatmap drawn");
    let title = format!("{} temperature calendar", year);
    finish(KIND, &title, &figure, rgb, &output, options.wants_display())
}
