#![warn(clippy::all, rust_2018_idioms)]

use std::path::Path;

use eframe_whiteboard::{WhiteboardApp, WhiteboardConfig, app};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = WhiteboardConfig::load_or_default(Path::new("whiteboard.json"));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Whiteboard")
            .with_inner_size([
                config.initial_width as f32 + 220.0,
                config.initial_height as f32 + 60.0,
            ]),
        ..Default::default()
    };
    eframe::run_native(
        app::APP_ID,
        native_options,
        Box::new(|cc| Ok(Box::new(WhiteboardApp::new(cc, config)))),
    )
}
