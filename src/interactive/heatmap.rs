use serde_json::{json, Value};

use super::{finish, round_to, visual_map_type, PageParams};
use crate::analysis::grouping::{pivot, pivot_axis_titles, pivot_col_label, pivot_row_label};
use crate::config::ChartOptions;
use crate::error::VizResult;
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries, TimeGranularity};

/// Category heatmap of mean temperature. Data points are `[x index, y index, value]`.
pub fn create_interactive_heatmap(
    series: &TemperatureSeries,
    granularity: TimeGranularity,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::InteractiveHeatmap;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let root = config.root();
    let params = PageParams::from_root(&root)?;

    let table = pivot(series, granularity);
    let x_labels: Vec<String> = table.col_keys.iter().map(|&k| pivot_col_label(granularity, k)).collect();
    let y_labels: Vec<String> = table.row_keys.iter().map(|&k| pivot_row_label(granularity, k)).collect();
    let data: Vec<Value> = table
        .values
        .indexed_iter()
        .filter(|(_, v)| v.is_finite())
        .map(|((row, col), v)| json!([col, row, round_to(*v, 1)]))
        .collect();
    let (x_name, y_name) = pivot_axis_titles(granularity);

    let option = json!({
        "title": params.title_option(),
        "tooltip": {"position": "top", "formatter": root.str("tooltip_formatter")?},
        "grid": {"top": 100, "right": "10%"},
        "xAxis": {
            "type": "category",
            "name": x_name,
            "data": x_labels,
            "splitArea": {"show": true},
            "axisLabel": {"rotate": root.f64("x_rotate")?, "fontSize": root.f64("x_font_size")?}
        },
        "yAxis": {
            "type": "category",
            "name": y_name,
            "data": y_labels,
            "splitArea": {"show": true},
            "axisLabel": {"fontSize": root.f64("y_font_size")?}
        },
        "visualMap": {
            "type": visual_map_type(root.bool("is_piecewise")?),
            "min": root.f64("visualmap_min")?,
            "max": root.f64("visualmap_max")?,
            "orient": root.str("visualmap_orient")?,
            "left": root.str("visualmap_pos_left")?,
            "top": root.str("visualmap_pos_top")?,
            "calculable": true,
            "inRange": {"color": root.str_list("visualmap_colors")?}
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
            "type": "heatmap",
            "name": params.series_name,
            "data": data,
            "label": {"show": root.bool("show_label")?}
        }]
    });

    let page = params.page().option(option);
    finish(KIND, &params, &page, options.wants_display())
}
