//! Default configuration registry.
//!
//! One immutable tree per chart kind. Lookups hand out `&'static` references,
//! so a resolver can only ever copy from the registry, never write into it.
//!
//! Static kinds are organised in sections (`figure`, `axis`, `text`,
//! `legend`, `output` plus one chart-specific section). Interactive kinds are
//! flat. Figure sizes are in inches and font sizes in points; renderers scale
//! both by `figure.dpi`.

use once_cell::sync::Lazy;
use serde_json::json;
use std::collections::HashMap;

use super::value::{ConfigTree, ConfigValue};
use crate::types::ChartKind;

static REGISTRY: Lazy<HashMap<ChartKind, ConfigTree>> = Lazy::new(|| {
    ChartKind::ALL
        .iter()
        .map(|&kind| (kind, seed(kind)))
        .collect()
});

/// Default configuration for `kind`.
pub fn defaults(kind: ChartKind) -> &'static ConfigTree {
    // every kind is seeded when the map is built
    &REGISTRY[&kind]
}

fn seed(kind: ChartKind) -> ConfigTree {
    let literal = match kind {
        ChartKind::StaticArea => static_area(),
        ChartKind::StaticBox => static_box(),
        ChartKind::StaticCalendar => static_calendar(),
        ChartKind::StaticHeatmap => static_heatmap(),
        ChartKind::StaticLine => static_line(),
        ChartKind::StaticSurface => static_surface(),
        ChartKind::InteractiveCalendar => interactive_calendar(),
        ChartKind::InteractiveHeatmap => interactive_heatmap(),
        ChartKind::InteractiveLine => interactive_line(),
        ChartKind::InteractiveSurface => interactive_surface(),
    };
    match ConfigValue::from(literal) {
        ConfigValue::Tree(tree) => tree,
        _ => ConfigTree::new(),
    }
}

const PALETTE_DIVERGING: [&str; 10] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#fee090", "#fdae61", "#f46d43",
    "#d73027", "#a50026",
];

fn static_area() -> serde_json::Value {
    json!({
        "figure": {"figsize": [16, 8], "dpi": 300},
        "area": {
            "fill_color": "#4c72b0",
            "alpha": 0.3,
            "linewidth": 1.2,
            "linestyle": "--",
            "edge_color": "#2c5f8b"
        },
        "axis": {
            "xlabel": "Date",
            "ylabel": "Temperature (°C)",
            "date_format": "%Y-%m",
            "rotation": 45,
            "grid": true,
            "grid_style": {"linestyle": ":", "alpha": 0.4}
        },
        "text": {
            "title": "Temperature Area Chart",
            "title_fontsize": 18,
            "label_fontsize": 14,
            "tick_fontsize": 12
        },
        "legend": {"show": true, "label": "Temperature", "loc": "upper left", "fontsize": 12},
        "output": {"save_path": null, "filename": "temperature_area_plot", "save_dpi": 300}
    })
}

fn static_box() -> serde_json::Value {
    json!({
        "figure": {"figsize": [16, 8], "dpi": 300},
        "box": {
            "patch_artist": true,
            "show_means": true,
            "show_fliers": true,
            "widths": 0.6,
            "facecolor": "#4c72b0",
            "alpha": 0.8,
            "edgecolor": "#2c3e50",
            "linewidth": 1.5,
            "flier_marker": "o",
            "flier_size": 4,
            "flier_color": "#d62728",
            "flier_alpha": 0.5
        },
        "axis": {
            "xlabel": null,
            "ylabel": "Temperature (°C)",
            "grid": true,
            "grid_style": {"linestyle": "--", "alpha": 0.6},
            "rotation": 45
        },
        "text": {
            "title": "Temperature Box Plot",
            "title_fontsize": 18,
            "label_fontsize": 14,
            "tick_fontsize": 12
        },
        "output": {"save_path": null, "filename": "temperature_box_plot", "save_dpi": 300}
    })
}

fn static_calendar() -> serde_json::Value {
    json!({
        "figure": {"figsize": [24, 12], "dpi": 300},
        "heatmap": {
            "cmap": "YlOrRd",
            "vmin": -10,
            "vmax": 40,
            "show_date": true,
            "cbar_label": "Temperature (°C)",
            "cbar_fontsize": 12,
            "cbar_pos": [0.2, 0.08, 0.6, 0.03]
        },
        "text": {
            "month_fontsize": 12,
            "weekday_fontsize": 10,
            "date_fontsize": 6,
            "date_color": "#333333"
        },
        "output": {"save_path": null, "filename": "mat_calendar_heatmap", "save_dpi": 300}
    })
}

fn static_heatmap() -> serde_json::Value {
    json!({
        "figure": {"figsize": [20, 8], "dpi": 300},
        "heatmap": {
            "cmap_colors": ["#2b8cbe", "#a6bddb", "#f0f0f0", "#fdbb84", "#e34a33"],
            "cmap_levels": 256,
            "aspect_ratio": "auto",
            "vmin": -20,
            "vmax": 40,
            "interpolation": "nearest",
            "cbar_label": "Temperature (°C)"
        },
        "axis": {"xlabel": null, "ylabel": null, "x_rotation": 45, "grid": false},
        "text": {
            "title": "Hourly Temperature Heatmap",
            "title_fontsize": 18,
            "label_fontsize": 14,
            "tick_fontsize": 12
        },
        "output": {"save_path": null, "filename": "temperature_heatmap", "save_dpi": 300}
    })
}

fn static_line() -> serde_json::Value {
    json!({
        "figure": {"figsize": [14, 7], "dpi": 300},
        "line": {
            "color": "#2c7fb8",
            "linestyle": "-",
            "linewidth": 1.5,
            "alpha": 0.8,
            "marker": null,
            "markersize": 4
        },
        "axis": {
            "xlabel": "Date",
            "ylabel": "Temperature (°C)",
            "date_format": "%Y-%m",
            "rotation": 45,
            "grid": true,
            "grid_style": {"linestyle": "--", "alpha": 0.6}
        },
        "text": {
            "title": "Hourly Temperature Trend",
            "title_fontsize": 16,
            "label_fontsize": 12,
            "tick_fontsize": 10
        },
        "legend": {"show": false, "label": null, "loc": "upper right", "fontsize": 12},
        "output": {"save_path": null, "filename": "temperature_line_plot", "save_dpi": 300}
    })
}

fn static_surface() -> serde_json::Value {
    json!({
        "figure": {"figsize": [16, 10], "dpi": 300},
        "surface": {
            "cmap": "coolwarm",
            "rstride": 3,
            "cstride": 10,
            "alpha": 0.8,
            "linewidth": 0.5,
            "antialiased": true,
            "cbar_label": "Temperature (°C)",
            "cbar_fontsize": 12,
            "elevation": 25,
            "azimuth": -120
        },
        "axis": {"xlabel": "Date", "ylabel": "Hour", "zlabel": "Temperature (°C)", "label_pad": 15},
        "text": {
            "title": "Temperature Over the Year",
            "title_fontsize": 18,
            "label_fontsize": 14,
            "tick_fontsize": 10,
            "title_ypos": 0.92
        },
        "output": {"save_path": null, "filename": "3d_temperature_surface", "save_dpi": 300}
    })
}

fn interactive_calendar() -> serde_json::Value {
    json!({
        "width": "1800px",
        "height": "1000px",
        "theme": "light",
        "series_name": "Daily temperature",
        "title": "2024 Temperature Calendar",
        "subtitle": "Source: simulated data | Unit: °C",
        "title_font_size": 22,
        "title_color": "#2c343c",
        "day_margin": 30,
        "month_margin": 30,
        "pos_left": "100px",
        "pos_right": "60px",
        "orient": "horizontal",
        "vmin": -10,
        "vmax": 40,
        "visualmap_orient": "vertical",
        "visualmap_pos_left": "50px",
        "visualmap_pos_top": "center",
        "range_colors": ["#f0f9e8", "#bae4bc", "#7bccc4", "#43a2ca", "#0868ac"],
        "is_piecewise": true,
        "tooltip_formatter": "Date: {b}<br/>Temperature: {c}°C",
        "output_path": null,
        "filename": "pye_calendar_heatmap"
    })
}

fn interactive_heatmap() -> serde_json::Value {
    json!({
        "width": "2000px",
        "height": "800px",
        "theme": "dark",
        "series_name": "Temperature",
        "show_label": false,
        "title": "Temperature Heatmap",
        "subtitle": "Source: simulated data | Unit: °C",
        "title_font_size": 22,
        "title_color": "#ffffff",
        "x_rotate": 45,
        "x_font_size": 12,
        "y_font_size": 14,
        "visualmap_min": -20,
        "visualmap_max": 40,
        "visualmap_orient": "vertical",
        "visualmap_pos_left": "93%",
        "visualmap_pos_top": "center",
        "visualmap_colors": PALETTE_DIVERGING,
        "is_piecewise": true,
        "tooltip_formatter": "Temperature: {c} °C<br/>X: {b}<br/>Y: {a}",
        "datazoom_range_start": 0,
        "datazoom_range_end": 100,
        "output_path": null,
        "filename": "pye_temperature_heatmap"
    })
}

fn interactive_line() -> serde_json::Value {
    json!({
        "width": "1600px",
        "height": "800px",
        "theme": "light",
        "series_name": "Temperature",
        "is_smooth": true,
        "symbol": "circle",
        "symbol_size": 6,
        "line_color": "#c23531",
        "line_width": 2,
        "line_type": "solid",
        "area_opacity": 0.1,
        "area_color_js": "new echarts.graphic.LinearGradient(0, 0, 0, 1, [{offset: 0, color: 'rgba(204,51,51,0.8)'}, {offset: 1, color: 'rgba(204,51,51,0)'}])",
        "title": "Temperature Trend",
        "subtitle": "Source: simulated data",
        "title_font_size": 22,
        "title_color": "#2c343c",
        "xaxis_name": "Date",
        "yaxis_name": "Temperature (°C)",
        "xaxis_rotate": 30,
        "xaxis_font_size": 12,
        "yaxis_font_size": 14,
        "show_label": false,
        "date_format": "%Y-%m-%d",
        "datazoom_range_start": 0,
        "datazoom_range_end": 100,
        "output_path": null,
        "filename": "pye_temperature_line"
    })
}

fn interactive_surface() -> serde_json::Value {
    json!({
        "width": "1600px",
        "height": "900px",
        "theme": "dark",
        "series_name": "Temperature surface",
        "shading": "color",
        "xaxis_name": "Day of Year",
        "yaxis_name": "Hour",
        "zaxis_name": "Temperature",
        "title": "Temperature Surface",
        "subtitle": "Source: simulated data | Unit: °C",
        "title_font_size": 22,
        "title_color": "#ffffff",
        "vmin": -10,
        "vmax": 40,
        "range_colors": PALETTE_DIVERGING,
        "visualmap_pos_left": "5%",
        "visualmap_pos_top": "center",
        "tooltip_formatter": "Day: {x}<br/>Hour: {y}<br/>Temperature: {z}°C",
        "output_path": null,
        "filename": "3d_temperature_surface"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_registered() {
        for kind in ChartKind::ALL {
            assert!(!defaults(kind).is_empty(), "{kind} has no defaults");
        }
    }

    #[test]
    fn test_static_kinds_carry_figure_and_output_sections() {
        for kind in ChartKind::ALL.iter().filter(|k| k.flavor() == crate::types::Flavor::Static) {
            let tree = defaults(*kind);
            assert!(tree.section("figure").is_ok(), "{kind} lacks figure");
            assert!(tree.section("output").unwrap().str("filename").is_ok());
        }
    }

    #[test]
    fn test_interactive_kinds_are_flat() {
        for kind in ChartKind::ALL.iter().filter(|k| k.flavor() == crate::types::Flavor::Interactive) {
            let tree = defaults(*kind);
            assert!(tree.iter().all(|(_, v)| v.as_tree().is_none()), "{kind} is nested");
            assert!(tree.root().str("filename").is_ok());
            assert!(tree.get("output_path").unwrap().is_null());
        }
    }

    #[test]
    fn test_lookup_returns_the_same_tree() {
        let a = defaults(ChartKind::StaticBox) as *const ConfigTree;
        let b = defaults(ChartKind::StaticBox) as *const ConfigTree;
        assert_eq!(a, b);
    }
}
