//! Desktop viewer for rendered charts.
//!
//! Static charts are shown as textures built straight from the rendered RGB
//! buffer; interactive charts are listed with the path of their HTML file.

pub mod state;
pub mod ui;

pub use state::{AppWrapper, ViewerState};

use std::sync::{Arc, Mutex};

use crate::error::{VizError, VizResult};
use crate::types::ChartArtifact;

/// Open a window over `artifacts` and block until it is closed.
///
/// Does nothing when the list is empty.
pub fn launch_viewer(artifacts: Vec<ChartArtifact>) -> VizResult<()> {
    if artifacts.is_empty() {
        return Ok(());
    }
    tracing::info!(charts = artifacts.len(), "opening chart viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Temperature Charts"),
        ..Default::default()
    };

    let state = Arc::new(Mutex::new(ViewerState::new(artifacts)));
    eframe::run_native(
        "Temperature Charts",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(egui::FontDefinitions::default());
            Ok(Box::new(AppWrapper { app: state }) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| VizError::Viewer(e.to_string()))
}
