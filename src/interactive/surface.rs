use serde_json::{json, Value};

use super::{finish, round_to, PageParams};
use crate::analysis::grouping::pivot;
use crate::config::ChartOptions;
use crate::error::{VizError, VizResult};
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries, TimeGranularity};

/// WebGL surface of temperature over day of year and hour for `year`.
///
/// Points are emitted day-major so the renderer sees a regular grid; gaps
/// become nulls.
pub fn create_interactive_surface(
    series: &TemperatureSeries,
    year: i32,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::InteractiveSurface;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let root = config.root();
    let params = PageParams::from_root(&root)?;

    let table = pivot(&series.filter_year(year), TimeGranularity::Hour);
    if table.value_range().is_none() {
        return Err(VizError::EmptySeries(format!("{} has no readings in {}", KIND, year)));
    }
    let mut data: Vec<Value> = Vec::with_capacity(table.values.len());
    for (col, day) in table.col_keys.iter().enumerate() {
        for (row, hour) in table.row_keys.iter().enumerate() {
            let v = table.values[[row, col]];
            let z = v.is_finite().then(|| round_to(v, 1));
            data.push(json!([day, hour, z]));
        }
    }

    let option = json!({
        "title": params.title_option(),
        "tooltip": {"formatter": root.str("tooltip_formatter")?},
        "visualMap": {
            "show": true,
            "dimension": 2,
            "min": root.f64("vmin")?,
            "max": root.f64("vmax")?,
            "left": root.str("visualmap_pos_left")?,
            "top": root.str("visualmap_pos_top")?,
            "calculable": true,
            "inRange": {"color": root.str_list("range_colors")?}
        },
        "xAxis3D": {"type": "value", "name": root.str("xaxis_name")?},
        "yAxis3D": {"type": "value", "name": root.str("yaxis_name")?},
        "zAxis3D": {"type": "value", "name": root.str("zaxis_name")?},
        "grid3D": {
            "boxWidth": 200,
            "boxDepth": 80,
            "viewControl": {"projection": "perspective"}
        },
        "series": [{
            "type": "surface",
            "name": params.series_name,
            "shading": root.str("shading")?,
            "wireframe": {"show": false},
            "data": data
        }]
    });

    let page = params.page().option(option).with_gl();
    finish(KIND, &params, &page, options.wants_display())
}
