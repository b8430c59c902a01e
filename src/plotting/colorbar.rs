//! Colour bars drawn in pixel space next to a heatmap or surface.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::styles::{Colormap, TEXT_COLOR};
use super::Canvas;
use crate::error::VizResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

pub struct Colorbar<'a> {
    pub cmap: &'a Colormap,
    pub vmin: f64,
    pub vmax: f64,
    pub label: Option<&'a str>,
    pub font: &'a str,
    pub tick_px: f64,
    pub label_px: f64,
}

impl Colorbar<'_> {
    const TICKS: usize = 5;

    /// Draw the bar inside `(x0, y0)..(x1, y1)`, with ticks and label outside it.
    pub fn draw(&self, area: &Canvas<'_>, (x0, y0): (i32, i32), (x1, y1): (i32, i32), orientation: Orientation) -> VizResult<()> {
        let length = match orientation {
            Orientation::Horizontal => x1 - x0,
            Orientation::Vertical => y1 - y0,
        }
        .max(1);

        for step in 0..length {
            let t = step as f64 / (length - 1).max(1) as f64;
            let color = self.cmap.at(t);
            let rect = match orientation {
                Orientation::Horizontal => [(x0 + step, y0), (x0 + step + 1, y1)],
                // low values at the bottom
                Orientation::Vertical => [(x0, y1 - step - 1), (x1, y1 - step)],
            };
            area.draw(&Rectangle::new(rect, color.filled()))?;
        }
        area.draw(&Rectangle::new([(x0, y0), (x1, y1)], TEXT_COLOR.stroke_width(1)))?;

        let precision = if (self.vmax - self.vmin).abs() < 5.0 { 1 } else { 0 };
        let tick_font = (self.font, self.tick_px).into_font().color(&TEXT_COLOR);
        let gap = (self.tick_px * 0.4) as i32;
        for i in 0..Self::TICKS {
            let t = i as f64 / (Self::TICKS - 1) as f64;
            let value = self.vmin + (self.vmax - self.vmin) * t;
            let text = format!("{:.*}", precision, value);
            match orientation {
                Orientation::Horizontal => {
                    let x = x0 + ((x1 - x0) as f64 * t) as i32;
                    area.draw(&PathElement::new(vec![(x, y1), (x, y1 + gap)], TEXT_COLOR))?;
                    area.draw(&Text::new(
                        text,
                        (x, y1 + gap * 2),
                        tick_font.pos(Pos::new(HPos::Center, VPos::Top)),
                    ))?;
                }
                Orientation::Vertical => {
                    let y = y1 - ((y1 - y0) as f64 * t) as i32;
                    area.draw(&PathElement::new(vec![(x1, y), (x1 + gap, y)], TEXT_COLOR))?;
                    area.draw(&Text::new(
                        text,
                        (x1 + gap * 2, y),
                        tick_font.pos(Pos::new(HPos::Left, VPos::Center)),
                    ))?;
                }
            }
        }

        if let Some(label) = self.label {
            let font = (self.font, self.label_px).into_font().color(&TEXT_COLOR);
            match orientation {
                Orientation::Horizontal => {
                    let at = ((x0 + x1) / 2, y1 + gap * 3 + self.tick_px as i32);
                    area.draw(&Text::new(label, at, font.pos(Pos::new(HPos::Center, VPos::Top))))?;
                }
                Orientation::Vertical => {
                    let at = (x1 + gap * 3 + (self.tick_px * 3.0) as i32, (y0 + y1) / 2);
                    let style = font
                        .transform(FontTransform::Rotate90)
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    area.draw(&Text::new(label, at, style))?;
                }
            }
        }
        Ok(())
    }
}
