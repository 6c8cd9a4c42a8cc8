mod app;
mod color;
mod config;
mod data;
mod engine;
mod intake;
mod pipeline;
mod state;
mod ui;

use app::CompositeAnalyzerApp;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load();
    log::info!("Configuration: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Composite Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(CompositeAnalyzerApp::new(config)))),
    )
}
