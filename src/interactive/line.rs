use serde_json::json;

use super::{finish, round_to, PageParams};
use crate::analysis::calendar::validate_date_format;
use crate::config::ChartOptions;
use crate::error::VizResult;
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries};

/// Zoomable temperature line with a gradient-filled area.
pub fn create_interactive_line(series: &TemperatureSeries, options: &ChartOptions) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::InteractiveLine;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let root = config.root();
    let params = PageParams::from_root(&root)?;

    let date_format = root.str("date_format")?;
    validate_date_format("date_format", date_format)?;
    let dates: Vec<String> = series.iter().map(|r| r.timestamp.format(date_format).to_string()).collect();
    let values: Vec<Option<f64>> = series
        .iter()
        .map(|r| r.temperature.is_finite().then(|| round_to(r.temperature, 2)))
        .collect();

    let mut page = params.page();
    // a null gradient leaves the area in the line colour
    let area_color = match root.opt_str("area_color_js")? {
        Some(code) => page.script(code),
        None => serde_json::Value::Null,
    };

    let option = json!({
        "title": params.title_option(),
        "tooltip": {"trigger": "axis"},
        "grid": {"top": 100, "bottom": 120},
        "xAxis": {
            "type": "category",
            "name": root.str("xaxis_name")?,
            "boundaryGap": false,
            "data": dates,
            "axisLabel": {"rotate": root.f64("xaxis_rotate")?, "fontSize": root.f64("xaxis_font_size")?}
        },
        "yAxis": {
            "type": "value",
            "name": root.str("yaxis_name")?,
            "axisLabel": {"fontSize": root.f64("yaxis_font_size")?}
        },
        "dataZoom": [
            {
                "type": "slider",
                "start": root.f64("datazoom_range_start")?,
                "end": root.f64("datazoom_range_end")?
            },
            {"type": "inside"}
        ],
        "series": [{
            "type": "line",
            "name": params.series_name,
            "data": values,
            "smooth": root.bool("is_smooth")?,
            "symbol": root.str("symbol")?,
            "symbolSize": root.f64("symbol_size")?,
            "itemStyle": {"color": root.str("line_color")?},
            "lineStyle": {
                "color": root.str("line_color")?,
                "width": root.f64("line_width")?,
                "type": root.str("line_type")?
            },
            "areaStyle": {"opacity": root.f64("area_opacity")?, "color": area_color},
            "label": {"show": root.bool("show_label")?}
        }]
    });

    let page = page.option(option);
    finish(KIND, &params, &page, options.wants_display())
}
