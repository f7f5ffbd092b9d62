mod app;
mod color;
mod state;
mod ui;

use app::FrameBenchApp;
use eframe::egui;
use frame_bench::BenchConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = BenchConfig::load().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {e}");
        BenchConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Frame Bench – Polars vs Arrow",
        options,
        Box::new(move |_cc| Ok(Box::new(FrameBenchApp::new(config)))),
    )
}
