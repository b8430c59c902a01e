use serde_json::{json, Value};

use super::{finish, round_to, visual_map_type, PageParams};
use crate::config::ChartOptions;
use crate::error::{VizError, VizResult};
use crate::types::{ChartArtifact, ChartKind, TemperatureSeries};
use crate::utils::resample_daily_mean;

/// Calendar heatmap of daily mean temperature for `year`.
pub fn create_interactive_calendar(
    series: &TemperatureSeries,
    year: i32,
    options: &ChartOptions,
) -> VizResult<ChartArtifact> {
    const KIND: ChartKind = ChartKind::InteractiveCalendar;
    series.require_data(KIND)?;

    let config = options.resolve(KIND);
    let root = config.root();
    let params = PageParams::from_root(&root)?;

    let data: Vec<Value> = resample_daily_mean(&series.filter_year(year))
        .iter()
        .map(|r| json!([r.timestamp.format("%Y-%m-%d").to_string(), round_to(r.temperature, 1)]))
        .collect();
    if data.is_empty() {
        return Err(VizError::EmptySeries(format!("{} has no readings in {}", KIND, year)));
    }

    let option = json!({
        "title": params.title_option(),
        "tooltip": {"formatter": root.str("tooltip_formatter")?},
        "visualMap": {
            "type": visual_map_type(root.bool("is_piecewise")?),
            "min": root.f64("vmin")?,
            "max": root.f64("vmax")?,
            "orient": root.str("visualmap_orient")?,
            "left": root.str("visualmap_pos_left")?,
            "top": root.str("visualmap_pos_top")?,
            "calculable": true,
            "inRange": {"color": root.str_list("range_colors")?}
        },
        "calendar": {
            "range": year.to_string(),
            "orient": root.str("orient")?,
            "left": root.str("pos_left")?,
            "right": root.str("pos_right")?,
            "top": 120,
            "cellSize": ["auto", "auto"],
            "dayLabel": {"firstDay": 1, "margin": root.f64("day_margin")?},
            "monthLabel": {"margin": root.f64("month_margin")?},
            "yearLabel": {"show": true}
        },
        "series": [{
            "type": "heatmap",
            "coordinateSystem": "calendar",
            "name": params.series_name,
            "data": data
        }]
    });

    tracing::debug!(chart = %KIND, year, days = data.len(), "calendar option built");
    let page = params.page().option(option);
    finish(KIND, &params, &page, options.wants_display())
}
