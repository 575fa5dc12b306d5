mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::FileFlowApp;
use eframe::egui;

const APP_TITLE: &str = "FileFlow – Data Sweeper";

fn main() -> eframe::Result {
    env_logger::init();

    // Paths given on the command line are uploaded before the first frame.
    let startup: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(FileFlowApp::new(startup)))),
    )
}
