mod catalog;
mod filter;
mod loader;
mod model;
mod ui;

use std::path::Path;

use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::TradeupApp;

const DATA_DIR: &str = "tradeups_data";

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tradeup Explorer",
        options,
        Box::new(|cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(TradeupApp::new(Path::new(DATA_DIR))))
        }),
    )
}
