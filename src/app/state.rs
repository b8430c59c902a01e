use eframe::App as EApp;
use egui::TextureHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::{ArtifactBody, ChartArtifact};

/// Viewer state: the charts handed over by the producers and the selection.
pub struct ViewerState {
    pub charts: Vec<ChartArtifact>,
    pub selected: usize,
    pub fit_to_window: bool,
    /// Textures keyed by chart index, uploaded on first display.
    pub textures: HashMap<usize, TextureHandle>,
}

impl ViewerState {
    pub fn new(charts: Vec<ChartArtifact>) -> Self {
        Self {
            charts,
            selected: 0,
            fit_to_window: true,
            textures: HashMap::new(),
        }
    }

    pub fn current(&self) -> Option<&ChartArtifact> {
        self.charts.get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.charts.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if !self.charts.is_empty() {
            self.selected = (self.selected + 1) % self.charts.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.charts.is_empty() {
            self.selected = (self.selected + self.charts.len() - 1) % self.charts.len();
        }
    }

    /// Side-panel entry for chart `index`.
    pub fn entry_label(&self, index: usize) -> String {
        match self.charts.get(index) {
            Some(chart) => format!("{} ({})", chart.title, chart.kind),
            None => String::new(),
        }
    }

    /// One-line summary of the selected chart.
    pub fn summary(&self) -> String {
        let Some(chart) = self.current() else {
            return "No charts".to_string();
        };
        let location = chart
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "not saved".to_string());
        match &chart.body {
            ArtifactBody::Raster { width, height, .. } => format!("{}x{} px, {}", width, height, location),
            ArtifactBody::Html(html) => format!("HTML document, {} bytes, {}", html.len(), location),
        }
    }
}

pub struct AppWrapper {
    pub app: Arc<Mutex<ViewerState>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx);
        } else {
            tracing::error!("failed to acquire viewer lock in update");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChartKind;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn raster(title: &str) -> ChartArtifact {
        ChartArtifact {
            kind: ChartKind::StaticLine,
            title: title.to_string(),
            path: Some(PathBuf::from("/tmp/line.png")),
            show: true,
            body: ArtifactBody::Raster {
                width: 2,
                height: 1,
                rgb: vec![0; 6],
            },
        }
    }

    fn page(title: &str) -> ChartArtifact {
        ChartArtifact {
            kind: ChartKind::InteractiveLine,
            title: title.to_string(),
            path: None,
            show: true,
            body: ArtifactBody::Html("<html></html>".to_string()),
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = ViewerState::new(vec![raster("a"), raster("b"), page("c")]);
        state.select_previous();
        assert_eq!(state.selected, 2);
        state.select_next();
        assert_eq!(state.selected, 0);
        state.select(7);
        assert_eq!(state.selected, 0);
        state.select(1);
        assert_eq!(state.current().unwrap().title, "b");
    }

    #[test]
    fn test_empty_viewer() {
        let mut state = ViewerState::new(Vec::new());
        state.select_next();
        state.select_previous();
        assert!(state.current().is_none());
        assert_eq!(state.summary(), "No charts");
        assert_eq!(state.entry_label(0), "");
    }

    #[test]
    fn test_labels_and_summary() {
        let mut state = ViewerState::new(vec![raster("Trend"), page("Zoomable")]);
        assert_eq!(state.entry_label(0), "Trend (static-line)");
        assert_eq!(state.summary(), "2x1 px, /tmp/line.png");
        state.select_next();
        assert_eq!(state.summary(), "HTML document, 13 bytes, not saved");
    }
}
