mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::HousingLensApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::from_env();
    log::info!("Dataset path: {}", config.dataset_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Housing Lens – Affordability Trends",
        options,
        Box::new(|_cc| Ok(Box::new(HousingLensApp::new(config)))),
    )
}
