use egui::{ColorImage, Context, Key, TextureOptions};

use super::ViewerState;
use crate::types::ArtifactBody;

/// Draw the viewer: chart list on the left, selected chart in the centre.
pub fn draw_ui(app: &mut ViewerState, ctx: &Context) {
    if ctx.input(|i| i.key_pressed(Key::ArrowRight) || i.key_pressed(Key::ArrowDown)) {
        app.select_next();
    }
    if ctx.input(|i| i.key_pressed(Key::ArrowLeft) || i.key_pressed(Key::ArrowUp)) {
        app.select_previous();
    }

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Charts");
        ui.separator();

        let mut clicked = None;
        for index in 0..app.charts.len() {
            let label = app.entry_label(index);
            if ui.selectable_label(app.selected == index, label).clicked() {
                clicked = Some(index);
            }
        }
        if let Some(index) = clicked {
            app.select(index);
        }

        ui.separator();
        ui.checkbox(&mut app.fit_to_window, "Fit to window");
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(chart) = app.current() else {
            ui.label("No charts to display.");
            return;
        };
        let is_raster = chart.is_raster();
        let path = chart.path.clone();
        ui.heading(chart.title.as_str());
        ui.label(app.summary());
        ui.separator();

        if is_raster {
            let Some(texture) = load_chart_texture(app, ctx) else {
                ui.label("Failed to load chart image");
                return;
            };
            let fit = app.fit_to_window;
            egui::ScrollArea::both().show(ui, |ui| {
                if fit {
                    ui.add(egui::Image::new(&texture).shrink_to_fit());
                } else {
                    ui.image(&texture);
                }
            });
            return;
        }
        match path {
            Some(path) => {
                ui.label("Interactive chart; open it in a browser:");
                let url = format!("file://{}", path.display());
                ui.hyperlink_to(path.display().to_string(), url);
            }
            None => {
                ui.label("Interactive chart was not saved; set `output_path` to write it.");
            }
        }
    });
}

/// Texture for the selected chart, uploaded from its RGB buffer on first use.
fn load_chart_texture(app: &mut ViewerState, ctx: &Context) -> Option<egui::TextureHandle> {
    let index = app.selected;
    if let Some(texture) = app.textures.get(&index) {
        return Some(texture.clone());
    }
    let ArtifactBody::Raster { width, height, rgb } = &app.charts.get(index)?.body else {
        return None;
    };
    let size = [*width as usize, *height as usize];
    if rgb.len() != size[0] * size[1] * 3 {
        tracing::error!(index, "raster buffer does not match its dimensions");
        return None;
    }
    let texture = ctx.load_texture(
        format!("chart_{}", index),
        ColorImage::from_rgb(size, rgb),
        TextureOptions::LINEAR,
    );
    app.textures.insert(index, texture.clone());
    Some(texture)
}
