use eframe::egui;

use crate::engine::military_status::StatusLevel;
use crate::ui::app::{loading_row, CoachApp};

const STATUS_LEVELS: [StatusLevel; 5] = [
    StatusLevel::Urgent,
    StatusLevel::Caution,
    StatusLevel::Ok,
    StatusLevel::Tied,
    StatusLevel::Leading,
];

pub fn draw_settings_window(ctx: &egui::Context, app: &mut CoachApp) {
    let mut open = app.show_settings;

    egui::Window::new("Settings")
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                ui.label("UI Scale");
                ui.add(egui::Slider::new(&mut app.settings.ui_scale, 0.75..=2.0));
                ui.end_row();

                ui.label("Backend URL");
                ui.text_edit_singleline(&mut app.settings.backend_url);
                ui.end_row();

                ui.label("Request timeout (s)");
                ui.add(egui::DragValue::new(&mut app.settings.request_timeout_secs).range(1..=600));
                ui.end_row();

                ui.label("Max screenshot width");
                ui.add(egui::DragValue::new(&mut app.settings.max_image_width).range(320..=4096));
                ui.end_row();

                ui.label("JPEG quality");
                ui.add(egui::Slider::new(&mut app.settings.jpeg_quality, 0.1..=1.0));
                ui.end_row();
            });

            ui.collapsing("Military status colors", |ui| {
                for level in STATUS_LEVELS {
                    let mut color = app.settings.status_color(level);
                    ui.horizontal(|ui| {
                        if egui::color_picker::color_edit_button_srgba(
                            ui,
                            &mut color,
                            egui::color_picker::Alpha::Opaque,
                        )
                        .changed()
                        {
                            app.settings.set_status_color(level, color);
                        }
                        ui.label(format!("{level:?}"));
                    });
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() {
                    app.apply_settings();
                }

                if ui.button("Test connection").clicked() {
                    let cmd = app.session.check_health();
                    app.send_command(cmd);
                }
            });

            if app.session.checking_health {
                loading_row(ui, "Contacting backend...");
            }

            match &app.session.health {
                Some(Ok(summary)) => {
                    ui.colored_label(egui::Color32::from_rgb(90, 160, 90), summary.as_str());
                }
                Some(Err(e)) => {
                    ui.colored_label(egui::Color32::from_rgb(200, 60, 60), e.as_str());
                }
                None => {}
            }

            if app.session.loading || app.session.parsing {
                loading_row(ui, "A request is in flight; new settings apply after it.");
            }
        });

    app.show_settings = open;
}
