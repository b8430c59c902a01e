//! Colour, colour-map, font and line-style helpers for the static renderers.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{VizError, VizResult};

/// Parse `#rrggbb`, `#rgb` or one of a handful of colour names.
pub fn parse_color(raw: &str) -> VizResult<RGBColor> {
    let s = raw.trim();
    let named = match s.to_ascii_lowercase().as_str() {
        "white" => Some(RGBColor(255, 255, 255)),
        "black" => Some(RGBColor(0, 0, 0)),
        "red" => Some(RGBColor(214, 39, 40)),
        "blue" => Some(RGBColor(31, 119, 180)),
        "green" => Some(RGBColor(44, 160, 44)),
        "orange" => Some(RGBColor(255, 127, 14)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    let hex = s
        .strip_prefix('#')
        .filter(|hex| hex.is_ascii())
        .ok_or_else(|| VizError::invalid("color", format!("`{}` is not a hex colour", raw)))?;
    let channel = |digits: &str| {
        u8::from_str_radix(digits, 16).map_err(|_| VizError::invalid("color", format!("`{}` is not a hex colour", raw)))
    };
    match hex.len() {
        6 => Ok(RGBColor(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
            Ok(RGBColor(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => Err(VizError::invalid("color", format!("`{}` is not a hex colour", raw))),
    }
}

/// Linear-segmented colour map over evenly spaced anchor colours.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    anchors: Vec<RGBColor>,
    levels: usize,
}

const YL_OR_RD: [&str; 9] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026", "#800026",
];
const RD_YL_BU: [&str; 11] = [
    "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee090", "#ffffbf", "#e0f3f8", "#abd9e9", "#74add1",
    "#4575b4", "#313695",
];
const COOLWARM: [&str; 8] = [
    "#3b4cc0", "#6788ee", "#9abbff", "#c9d7f0", "#edd1c2", "#f7a889", "#e26952", "#b40426",
];
const VIRIDIS: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58", "#b5de2b",
    "#fde725",
];
const BLUES: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c", "#08306b",
];

impl Colormap {
    pub const DEFAULT_LEVELS: usize = 256;

    pub fn from_colors<S: AsRef<str>>(colors: &[S], levels: usize) -> VizResult<Self> {
        if colors.is_empty() {
            return Err(VizError::invalid("cmap_colors", "at least one colour is required"));
        }
        let anchors = colors.iter().map(|c| parse_color(c.as_ref())).collect::<VizResult<Vec<_>>>()?;
        Ok(Self {
            anchors,
            levels: levels.max(2),
        })
    }

    /// Look up a named map; a `_r` suffix reverses it.
    pub fn named(name: &str) -> VizResult<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        let anchors: &[&str] = match base {
            "YlOrRd" => &YL_OR_RD,
            "RdYlBu" => &RD_YL_BU,
            "coolwarm" => &COOLWARM,
            "viridis" => &VIRIDIS,
            "Blues" => &BLUES,
            other => {
                return Err(VizError::invalid(
                    "cmap",
                    format!("unknown colour map `{}` (expected YlOrRd, RdYlBu, coolwarm, viridis or Blues)", other),
                ))
            }
        };
        let mut map = Self::from_colors(anchors, Self::DEFAULT_LEVELS)?;
        if reversed {
            map.anchors.reverse();
        }
        Ok(map)
    }

    /// Colour at `t` in `[0, 1]`, quantised to the map's level count.
    pub fn at(&self, t: f64) -> RGBColor {
        if self.anchors.len() == 1 {
            return self.anchors[0];
        }
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let t = (t * (self.levels - 1) as f64).round() / (self.levels - 1) as f64;
        let scaled = t * (self.anchors.len() - 1) as f64;
        let i = (scaled.floor() as usize).min(self.anchors.len() - 2);
        let frac = scaled - i as f64;
        let (a, b) = (self.anchors[i], self.anchors[i + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Colour for `value` normalised into `[vmin, vmax]`.
    pub fn map(&self, value: f64, vmin: f64, vmax: f64) -> RGBColor {
        let span = vmax - vmin;
        let t = if span.abs() < f64::EPSILON { 0.5 } else { (value - vmin) / span };
        self.at(t)
    }
}

/// Dash pattern, in polyline segments on and off, for a matplotlib-style line style.
pub fn dash_pattern(linestyle: &str) -> VizResult<Option<(usize, usize)>> {
    match linestyle {
        "-" | "solid" | "" => Ok(None),
        "--" | "dashed" => Ok(Some((4, 2))),
        ":" | "dotted" => Ok(Some((1, 1))),
        "-." | "dashdot" => Ok(Some((4, 1))),
        other => Err(VizError::invalid("linestyle", format!("unsupported line style `{}`", other))),
    }
}

/// Split a polyline into the visible runs of a dash pattern.
pub fn dash_runs(points: &[(f64, f64)], pattern: Option<(usize, usize)>) -> Vec<Vec<(f64, f64)>> {
    let Some((on, off)) = pattern else {
        return vec![points.to_vec()];
    };
    let (on, period) = (on.max(1), on.max(1) + off);
    let mut runs = Vec::new();
    let mut start = 0;
    while start + 1 < points.len() {
        let end = (start + on).min(points.len() - 1);
        runs.push(points[start..=end].to_vec());
        start += period;
    }
    runs
}

/// Point marker shapes accepted by `marker` / `flier_marker` leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
    Cross,
}

impl Marker {
    pub fn parse(raw: &str) -> VizResult<Self> {
        match raw {
            "o" | "." => Ok(Marker::Circle),
            "s" => Ok(Marker::Square),
            "^" => Ok(Marker::Triangle),
            "x" | "+" => Ok(Marker::Cross),
            other => Err(VizError::invalid("marker", format!("unsupported marker `{}`", other))),
        }
    }
}

pub fn legend_position(loc: &str) -> VizResult<SeriesLabelPosition> {
    Ok(match loc {
        "upper left" => SeriesLabelPosition::UpperLeft,
        "upper right" | "best" => SeriesLabelPosition::UpperRight,
        "upper center" => SeriesLabelPosition::UpperMiddle,
        "center left" => SeriesLabelPosition::MiddleLeft,
        "center right" => SeriesLabelPosition::MiddleRight,
        "center" => SeriesLabelPosition::MiddleMiddle,
        "lower left" => SeriesLabelPosition::LowerLeft,
        "lower right" => SeriesLabelPosition::LowerRight,
        "lower center" => SeriesLabelPosition::LowerMiddle,
        other => return Err(VizError::invalid("legend.loc", format!("unknown legend location `{}`", other))),
    })
}

/// Tick-label style; plotters only rotates in quarter turns, so 45° and up become vertical.
pub fn tick_style<'a>(family: &'a str, size: f64, rotation: f64, color: &'a RGBColor) -> TextStyle<'a> {
    let style = (family, size).into_font().color(color);
    if rotation.abs() >= 45.0 {
        style
            .transform(FontTransform::Rotate90)
            .pos(Pos::new(HPos::Right, VPos::Center))
    } else {
        style
    }
}

pub const TEXT_COLOR: RGBColor = RGBColor(34, 34, 34);
pub const GRID_COLOR: RGBColor = RGBColor(176, 176, 176);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#4c72b0").unwrap(), RGBColor(0x4c, 0x72, 0xb0));
        assert_eq!(parse_color("#fff").unwrap(), RGBColor(255, 255, 255));
        assert_eq!(parse_color("white").unwrap(), RGBColor(255, 255, 255));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("4c72b0").is_err());
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_colormap_endpoints_and_reversal() {
        let map = Colormap::named("YlOrRd").unwrap();
        assert_eq!(map.at(0.0), parse_color("#ffffcc").unwrap());
        assert_eq!(map.at(1.0), parse_color("#800026").unwrap());

        let reversed = Colormap::named("YlOrRd_r").unwrap();
        assert_eq!(reversed.at(0.0), parse_color("#800026").unwrap());
    }

    #[test]
    fn test_colormap_normalises_and_clamps() {
        let map = Colormap::from_colors(&["#000000", "#ffffff"], 256).unwrap();
        assert_eq!(map.map(-100.0, -10.0, 40.0), RGBColor(0, 0, 0));
        assert_eq!(map.map(100.0, -10.0, 40.0), RGBColor(255, 255, 255));
        let mid = map.map(15.0, -10.0, 40.0);
        assert!((126..=129).contains(&mid.0));
    }

    #[test]
    fn test_colormap_levels_quantise() {
        let map = Colormap::from_colors(&["#000000", "#ffffff"], 2).unwrap();
        assert_eq!(map.at(0.4), RGBColor(0, 0, 0));
        assert_eq!(map.at(0.6), RGBColor(255, 255, 255));
    }

    #[test]
    fn test_unknown_colormap_fails_fast() {
        assert!(matches!(Colormap::named("jet"), Err(VizError::InvalidParameter { .. })));
    }

    #[test]
    fn test_dash_runs() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 0.0)).collect();
        assert_eq!(dash_runs(&points, None).len(), 1);

        let runs = dash_runs(&points, Some((2, 1)));
        assert_eq!(runs[0], vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert_eq!(runs[1][0], (3.0, 0.0));
        assert!(dash_pattern("-.-").is_err());
    }

    #[test]
    fn test_legend_position() {
        assert!(legend_position("upper left").is_ok());
        assert!(legend_position("somewhere").is_err());
    }

    #[test]
    fn test_marker_parse() {
        assert_eq!(Marker::parse("o").unwrap(), Marker::Circle);
        assert!(Marker::parse("*").is_err());
    }
}
