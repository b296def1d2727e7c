mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::LaunchDashApp;
use clap::Parser;
use config::Config;
use eframe::egui;
use state::{AppState, DashboardContext};

/// Launch records dashboard: success share and payload correlation per site.
#[derive(Debug, Parser)]
#[command(name = "launch-dash", version, about)]
struct Args {
    /// Launch table to open (.csv, .json or .parquet). Overrides the config.
    data: Option<PathBuf>,

    /// Config file (default: ~/.launch-dash/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Payload slider step in kg
    #[arg(long)]
    payload_step: Option<f64>,

    /// Launch site selected at startup (default: All Sites)
    #[arg(long)]
    site: Option<String>,
}

fn main() -> eframe::Result {
    env_logger::init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref());
    if let Some(path) = args.data {
        config.data_path = path;
    }
    if let Some(step) = args.payload_step {
        config.payload_step_kg = step;
    }

    // The dataset is read once here and cached for the process lifetime.
    let mut state = AppState::new(config.payload_step_kg, config.payload_marks_kg.clone());
    match DashboardContext::load(&config.data_path) {
        Ok(context) => state.set_context(context),
        Err(e) => state.fail(e),
    }
    if let Some(site) = &args.site {
        state.select_site_label(site);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(LaunchDashApp::new(state)))),
    )
}
