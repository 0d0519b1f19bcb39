mod app;
mod color;
mod state;
mod ui;

use app::MarriageExplorerApp;
use eframe::egui;
use marriage_explorer::Config;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env();
    log::info!("Starting with dataset {}", config.dataset_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "World Marriage Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(MarriageExplorerApp::new(config)))),
    )
}
