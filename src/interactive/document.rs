//! Self-contained HTML pages that render an ECharts option object.

use serde_json::Value;

use crate::error::VizResult;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";
const ECHARTS_GL_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts-gl@2.0.9/dist/echarts-gl.min.js";

/// One chart page.
///
/// Raw JavaScript (gradient constructors and the like) cannot live inside
/// JSON, so the option carries a string placeholder per snippet, and the
/// placeholder, quotes included, is swapped for the code after serialization.
#[derive(Debug, Clone)]
pub struct EchartsPage {
    pub title: String,
    pub width: String,
    pub height: String,
    pub theme: String,
    pub option: Value,
    pub needs_gl: bool,
    scripts: Vec<(String, String)>,
}

impl EchartsPage {
    pub fn new(title: impl Into<String>, width: impl Into<String>, height: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: width.into(),
            height: height.into(),
            theme: theme.into(),
            option: Value::Null,
            needs_gl: false,
            scripts: Vec::new(),
        }
    }

    pub fn option(mut self, option: Value) -> Self {
        self.option = option;
        self
    }

    pub fn with_gl(mut self) -> Self {
        self.needs_gl = true;
        self
    }

    /// Reserve a placeholder for a JavaScript expression and return it for use in the option.
    pub fn script(&mut self, code: impl Into<String>) -> Value {
        let placeholder = format!("__tempviz_js_{}__", self.scripts.len());
        self.scripts.push((placeholder.clone(), code.into()));
        Value::String(placeholder)
    }

    pub fn render(&self) -> VizResult<String> {
        let mut option = escape_script(&serde_json::to_string_pretty(&self.option)?);
        for (placeholder, code) in &self.scripts {
            option = option.replace(&format!("\"{}\"", placeholder), code);
        }
        let theme = escape_script(&serde_json::to_string(&self.theme)?);
        let gl = if self.needs_gl {
            format!("<script src=\"{}\"></script>\n", ECHARTS_GL_CDN)
        } else {
            String::new()
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{echarts}"></script>
{gl}</head>
<body>
<div id="chart" style="width:{width};height:{height};"></div>
<script>
var chart = echarts.init(document.getElementById('chart'), {theme});
var option = {option};
chart.setOption(option);
</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            echarts = ECHARTS_CDN,
            gl = gl,
            width = escape_html(&self.width),
            height = escape_html(&self.height),
            theme = theme,
            option = option,
        ))
    }
}

/// Keep serialized JSON from closing the inline `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
