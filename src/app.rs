use std::path::PathBuf;

use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FileFlowApp {
    pub state: AppState,
}

impl FileFlowApp {
    pub fn new(startup_files: Vec<PathBuf>) -> Self {
        let mut app = Self::default();
        panels::upload_paths(&mut app.state, startup_files);
        app
    }
}

impl eframe::App for FileFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Files dropped onto the window ----
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        panels::upload_paths(&mut self.state, dropped);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: one card per file, or the template form ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.files.is_empty() {
                panels::template_form(ui, &mut self.state);
            } else {
                panels::file_cards(ui, &mut self.state);
            }
        });
    }
}
