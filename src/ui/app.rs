use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use eframe::egui;
use tracing::{error, info, warn};

use crate::engine::engine::Engine;
use crate::engine::image_normalizer::decode_data_uri;
use crate::engine::protocol::{EngineCommand, EngineConfig, EngineResponse, Lane};
use crate::model::session::CoachSession;
use crate::ui::coaching_panel::draw_coaching_panel;
use crate::ui::form_panel::draw_form_panel;
use crate::ui::settings::UiSettings;
use crate::ui::settings_window::draw_settings_window;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/* =========================
   App
   ========================= */

pub struct CoachApp {
    pub(crate) session: CoachSession,
    pub(crate) settings: UiSettings,
    pub(crate) show_settings: bool,
    pub(crate) screenshot: Option<egui::TextureHandle>,

    advice_tx: mpsc::Sender<EngineCommand>,
    screenshot_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
}

impl CoachApp {
    pub fn new(settings: UiSettings) -> Self {
        let (resp_tx, resp_rx) = mpsc::channel();

        let config = settings.engine_config();
        info!(backend_url = %config.backend_url, "starting engine workers");

        let advice_tx = spawn_worker(&config, resp_tx.clone());
        let screenshot_tx = spawn_worker(&config, resp_tx);

        Self {
            session: CoachSession::default(),
            settings,
            show_settings: false,
            screenshot: None,
            advice_tx,
            screenshot_tx,
            resp_rx,
        }
    }

    pub(crate) fn send_command(&self, cmd: EngineCommand) {
        for &lane in cmd.lanes() {
            let tx = match lane {
                Lane::Advice => &self.advice_tx,
                Lane::Screenshot => &self.screenshot_tx,
            };
            if tx.send(cmd.clone()).is_err() {
                error!(?lane, "engine worker is gone, command dropped");
            }
        }
    }

    pub(crate) fn suggest_moves(&mut self) {
        if let Some(cmd) = self.session.suggest_moves() {
            self.send_command(cmd);
        }
    }

    pub(crate) fn evaluate_move(&mut self) {
        if let Some(cmd) = self.session.evaluate_move() {
            self.send_command(cmd);
        }
    }

    pub(crate) fn submit_screenshot(&mut self, image: Vec<u8>) {
        if let Some(cmd) = self.session.load_screenshot(image) {
            self.send_command(cmd);
        }
    }

    pub(crate) fn open_screenshot(&mut self, path: &Path) {
        match fs::read(path) {
            Ok(bytes) => {
                info!(path = %path.display(), size = bytes.len(), "screenshot selected");
                self.submit_screenshot(bytes);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "screenshot could not be read");
                self.session.parse_error = Some(format!("Could not open {}: {e}", path.display()));
            }
        }
    }

    pub(crate) fn pick_screenshot(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.open_screenshot(&path);
        }
    }

    /// Apply changed settings: persist them and point the engine at the
    /// new backend.
    pub(crate) fn apply_settings(&mut self) {
        crate::ui::settings_io::save_settings(&self.settings);
        self.send_command(EngineCommand::Reconfigure(self.settings.engine_config()));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        // Only the first image counts, like a single paste
        if let Some(file) = dropped.into_iter().next() {
            if let Some(bytes) = file.bytes {
                self.submit_screenshot(bytes.to_vec());
            } else if let Some(path) = file.path {
                self.open_screenshot(&path);
            }
            return;
        }

        // A pasted `data:image/...` string stands in for a pasted bitmap
        let pasted = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Paste(text) if text.trim_start().starts_with("data:image/") => {
                    Some(text.trim().to_string())
                }
                _ => None,
            })
        });

        if let Some(uri) = pasted {
            match decode_data_uri(&uri) {
                Ok(bytes) => self.submit_screenshot(bytes),
                Err(e) => {
                    warn!(error = %e, "pasted text is not a usable image");
                    self.session.parse_error = Some(e.to_string());
                }
            }
        }
    }

    fn drain_engine(&mut self, ctx: &egui::Context) {
        while let Ok(resp) = self.resp_rx.try_recv() {
            self.session.apply(resp);
        }

        if let Some(preview) = self.session.take_new_preview() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [preview.width as usize, preview.height as usize],
                &preview.rgba,
            );
            self.screenshot =
                Some(ctx.load_texture("screenshot", image, egui::TextureOptions::LINEAR));
        }
    }
}

fn spawn_worker(
    config: &EngineConfig,
    resp_tx: mpsc::Sender<EngineResponse>,
) -> mpsc::Sender<EngineCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let config = config.clone();

    std::thread::spawn(move || {
        let mut engine = Engine::new(cmd_rx, resp_tx, &config);
        engine.run();
    });

    cmd_tx
}

/* =========================
   egui App
   ========================= */

impl eframe::App for CoachApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_pixels_per_point(self.settings.ui_scale);

        self.drain_engine(ctx);
        self.handle_dropped_files(ctx);

        /* HEADER */
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Through the Ages — AI Coach");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }
                });
            });
        });

        /* LEFT: game state form */
        draw_form_panel(ctx, self);

        /* CENTER: coaching */
        draw_coaching_panel(ctx, self);

        draw_settings_window(ctx, self);

        // Responses arrive on another thread; keep polling while waiting
        if self.session.waiting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/* =========================
   UI Helpers
   ========================= */

pub(crate) fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(title).strong());
        ui.add_space(4.0);
        add_contents(ui);
    });
    ui.add_space(6.0);
}

pub(crate) fn banner(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}

pub(crate) fn loading_row(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}
