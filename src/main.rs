mod ui;
mod engine;
mod model;

use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tta_coach=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = ui::settings_io::load_settings();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Through the Ages — AI Coach")
            .with_inner_size([1280.0, 860.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Through the Ages — AI Coach",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::CoachApp::new(settings)))),
    )
}
