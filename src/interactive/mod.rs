//! Interactive chart producers.
//!
//! Interactive configurations are flat. Each producer builds an ECharts
//! option object and, when `output_path` is set, writes
//! `<output_path>/<filename>.html`.

pub mod calendar;
pub mod document;
pub mod heatmap;
pub mod line;
pub mod surface;


pub use calendar::create_interactive_calendar;
pub use document::EchartsPage;
pub use heatmap::create_interactive_heatmap;
pub use line::create_interactive_line;
pub use surface::create_interactive_surface;

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::config::Section;
use crate::error::{VizError, VizResult};
use crate::types::{ArtifactBody, ChartArtifact, ChartKind};

/// Leaves every interactive configuration carries.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageParams {
    pub width: String,
    pub height: String,
    pub theme: String,
    pub series_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub title_font_size: f64,
    pub title_color: String,
    pub output_path: Option<PathBuf>,
    pub filename: String,
}

impl PageParams {
    pub fn from_root(root: &Section<'_>) -> VizResult<Self> {
        let filename = root.str("filename")?;
        if filename.is_empty() {
            return Err(VizError::invalid("filename", "must not be empty"));
        }
        Ok(Self {
            width: root.str("width")?.to_string(),
            height: root.str("height")?.to_string(),
            theme: root.str("theme")?.to_string(),
            series_name: root.str("series_name")?.to_string(),
            title: root.str("title")?.to_string(),
            subtitle: root.opt_str("subtitle")?.map(str::to_string),
            title_font_size: root.f64("title_font_size")?,
            title_color: root.str("title_color")?.to_string(),
            output_path: root.opt_str("output_path")?.map(PathBuf::from),
            filename: filename.to_string(),
        })
    }

    pub fn page(&self) -> EchartsPage {
        EchartsPage::new(&self.title, &self.width, &self.height, &self.theme)
    }

    pub fn title_option(&self) -> Value {
        json!({
            "text": self.title,
            "subtext": self.subtitle,
            "left": "center",
            "textStyle": {"fontSize": self.title_font_size, "color": self.title_color}
        })
    }
}

/// Visual-map kind for the `is_piecewise` leaf.
pub(crate) fn visual_map_type(piecewise: bool) -> &'static str {
    if piecewise {
        "piecewise"
    } else {
        "continuous"
    }
}

pub(crate) fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Render the page and write it if `output_path` is set.
pub(crate) fn finish(
    kind: ChartKind,
    params: &PageParams,
    page: &EchartsPage,
    show: bool,
) -> VizResult<ChartArtifact> {
    let html = page.render()?;
    let path = match &params.output_path {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}.{}", params.filename, kind.flavor().extension()));
            fs::write(&path, &html)?;
            tracing::info!(chart = %kind, path = %path.display(), "chart saved");
            Some(path)
        }
        None => None,
    };

    Ok(ChartArtifact {
        kind,
        title: params.title.clone(),
        path,
        show,
        body: ArtifactBody::Html(html),
    })
}
