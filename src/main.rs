mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::PopvizApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: path to a JSON config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let state = match DashboardConfig::discover(config_path.as_deref()).and_then(AppState::from_config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid configuration: {e:#}");
            eprintln!("popviz: {e:#}");
            std::process::exit(2);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Popviz – Population by Age",
        options,
        Box::new(|_cc| Ok(Box::new(PopvizApp::new(state)))),
    )
}
