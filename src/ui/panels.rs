use std::path::PathBuf;

use anyhow::{Context, Result};
use eframe::egui::{self, RichText, ScrollArea, Ui};

use fileflow::data::cleaning::CleaningReport;
use fileflow::data::export::{ExportArtifact, ExportFormat};
use fileflow::data::loader::UploadedFile;
use fileflow::data::pipeline::{FileOptions, ProcessedFile};
use fileflow::data::template::{CATEGORIES, category_fields};

use crate::color::status_color;
use crate::state::AppState;
use crate::ui::{plot, table};

/// Something a file card asked for; applied after the cards are drawn so the
/// outcomes are not borrowed while the state changes.
enum Action {
    SetOptions(String, FileOptions),
    Export(String),
    Remove(String),
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload files…").clicked() {
                upload_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear all").clicked() {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.files.is_empty() {
            let failed = state.outcomes.iter().filter(|o| o.result.is_err()).count();
            ui.label(format!("{} files loaded, {failed} with errors", state.files.len()));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            let is_error = msg.starts_with("Error");
            ui.label(RichText::new(msg).color(status_color(is_error)));
        }
    });
}

// ---------------------------------------------------------------------------
// File cards
// ---------------------------------------------------------------------------

/// One card per uploaded file: preview, cleaning, columns, chart, conversion.
pub fn file_cards(ui: &mut Ui, state: &mut AppState) {
    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for outcome in &state.outcomes {
                let options = state.options_for(&outcome.name);
                egui::CollapsingHeader::new(RichText::new(&outcome.name).heading())
                    .id_salt(&outcome.name)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| match &outcome.result {
                        Ok(processed) => file_card(ui, processed, options, &mut actions),
                        Err(e) => {
                            ui.label(RichText::new(e.to_string()).color(status_color(true)));
                            if ui.small_button("Remove").clicked() {
                                actions.push(Action::Remove(outcome.name.clone()));
                            }
                        }
                    });
                ui.separator();
            }
        });

    for action in actions {
        match action {
            Action::SetOptions(name, options) => state.set_options(&name, options),
            Action::Remove(name) => state.remove_file(&name),
            Action::Export(name) => export_and_save(state, &name),
        }
    }
}

fn file_card(
    ui: &mut Ui,
    processed: &ProcessedFile,
    before: FileOptions,
    actions: &mut Vec<Action>,
) {
    let name = &processed.name;
    let mut options = before.clone();

    ui.label(format!("File Size: {:.2} KB", processed.size_kb));

    ui.strong("Preview the head of the data");
    table::frame_table(ui, &format!("preview-{name}"), &processed.preview);
    ui.add_space(6.0);

    // ---- Cleaning ----
    ui.strong("Data Cleaning Options");
    ui.checkbox(&mut options.clean_requested, format!("Clean data for {name}"));
    if options.clean_requested {
        ui.horizontal(|ui: &mut Ui| {
            ui.checkbox(&mut options.dedupe_requested, "Remove duplicates");
            ui.checkbox(&mut options.impute_requested, "Fill missing values");
        });
        cleaning_messages(ui, &processed.cleaning);
    }
    ui.add_space(6.0);

    // ---- Columns ----
    ui.strong("Select Columns to Convert");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for column in &processed.all_columns {
            let mut checked = options.columns.is_selected(column);
            if ui.checkbox(&mut checked, column.as_str()).changed() {
                options.columns.toggle(column, &processed.all_columns);
            }
        }
    });
    ui.add_space(6.0);

    // ---- Chart ----
    ui.strong("Data Visualization");
    ui.checkbox(&mut options.show_chart, format!("Show visualization for {name}"));
    if let Some(series) = &processed.chart {
        plot::bar_chart(ui, &format!("chart-{name}"), series);
    }
    ui.add_space(6.0);

    // ---- Conversion ----
    ui.strong("Conversion Options");
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {name} to:"));
        for format in ExportFormat::ALL {
            ui.radio_value(&mut options.export_format, format, format.label());
        }
    });
    ui.label(format!(
        "{} rows x {} columns will be exported",
        processed.frame.height(),
        processed.frame.width()
    ));
    ui.horizontal(|ui: &mut Ui| {
        if ui.button(format!("Convert {name}")).clicked() {
            actions.push(Action::Export(name.clone()));
        }
        if ui.small_button("Remove").clicked() {
            actions.push(Action::Remove(name.clone()));
        }
    });

    if options != before {
        actions.push(Action::SetOptions(name.clone(), options));
    }
}

fn cleaning_messages(ui: &mut Ui, report: &CleaningReport) {
    if let Some(removed) = report.duplicates_removed {
        ui.label(format!("Duplicates removed: {removed}"));
    }
    if let Some(filled) = report.cells_filled {
        ui.label(format!("Missing values filled: {filled}"));
    }
}

// ---------------------------------------------------------------------------
// Template form
// ---------------------------------------------------------------------------

/// "No file? Create your own dataset": pick a category, fill its fields,
/// save a one-row CSV.
pub fn template_form(ui: &mut Ui, state: &mut AppState) {
    ui.heading("No file? Create your own dataset");
    ui.label("Upload CSV or Excel files from File → Upload files…, or fill in a template below.");
    ui.add_space(8.0);

    let mut category = state.template.category;
    egui::ComboBox::from_id_salt("template_category")
        .selected_text(category)
        .show_ui(ui, |ui: &mut Ui| {
            for (name, _) in CATEGORIES {
                ui.selectable_value(&mut category, *name, *name);
            }
        });
    state.set_category(category);

    ui.add_space(6.0);
    ui.strong("Fields for selected category:");
    let fields = category_fields(category).unwrap_or_default();
    egui::Grid::new("template_fields")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            for field in fields {
                ui.label(*field);
                let value = state.template.values.entry(field.to_string()).or_default();
                ui.text_edit_singleline(value);
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    if ui.button("Generate CSV").clicked() {
        match state.generate_template() {
            Ok(artifact) => save_with_status(state, &artifact),
            Err(e) => {
                log::error!("Template generation failed: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn upload_dialog(state: &mut AppState) {
    let Some(paths) = rfd::FileDialog::new()
        .set_title("Upload your files (CSV or Excel)")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files()
    else {
        return;
    };
    upload_paths(state, paths);
}

/// Read files from disk and add them to the state. Unreadable files are
/// reported in the status line.
pub fn upload_paths(state: &mut AppState, paths: Vec<PathBuf>) {
    if paths.is_empty() {
        return;
    }
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        match UploadedFile::from_path(&path) {
            Ok(file) => uploads.push(file),
            Err(e) => {
                log::error!("Failed to read {}: {e}", path.display());
                state.status_message = Some(format!("Error: {}: {e}", path.display()));
            }
        }
    }
    log::info!("Uploaded {} files", uploads.len());
    state.add_files(uploads);
}

fn export_and_save(state: &mut AppState, name: &str) {
    match state.export(name) {
        Ok(Some(artifact)) => save_with_status(state, &artifact),
        Ok(None) => {}
        Err(e) => {
            log::error!("Conversion of {name} failed: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

fn save_with_status(state: &mut AppState, artifact: &ExportArtifact) {
    match save_dialog(artifact) {
        Ok(Some(path)) => {
            state.status_message = Some(format!("Saved {}", path.display()));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to save {}: {e:#}", artifact.file_name);
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

/// Ask where to put `artifact` and write it there. `None` when cancelled.
fn save_dialog(artifact: &ExportArtifact) -> Result<Option<PathBuf>> {
    let extension = artifact.file_name.rsplit('.').next().unwrap_or_default();
    let Some(path) = rfd::FileDialog::new()
        .set_title("Download converted file")
        .set_file_name(artifact.file_name.as_str())
        .add_filter(artifact.mime_type, &[extension])
        .save_file()
    else {
        return Ok(None);
    };

    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved {} ({} bytes)", path.display(), artifact.bytes.len());
    Ok(Some(path))
}
