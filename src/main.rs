use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use pt_dashboard::app::DashboardApp;
use pt_dashboard::config::Config;
use pt_dashboard::data;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    // A dataset that cannot be loaded aborts startup before any window opens.
    let dataset = data::loader::load_file(&config.data)
        .with_context(|| format!("loading {}", config.data.display()))?;
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard Perguruan Tinggi Indonesia",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
