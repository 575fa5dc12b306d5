use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use fileflow::data::model::TabularFrame;

const ROW_HEIGHT: f32 = 18.0;

/// Render `frame` as a striped, read-only grid.
pub fn frame_table(ui: &mut Ui, id: &str, frame: &TabularFrame) {
    if frame.width() == 0 {
        ui.weak(format!("No columns ({} rows)", frame.height()));
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(TableColumn::auto().at_least(60.0), frame.width())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for column in frame.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.name.as_str());
                    });
                }
            })
            .body(|mut body| {
                for row in frame.rows() {
                    body.row(ROW_HEIGHT, |mut table_row| {
                        for cell in row {
                            table_row.col(|ui: &mut Ui| {
                                if cell.is_null() {
                                    ui.weak("None");
                                } else {
                                    ui.label(cell.to_string());
                                }
                            });
                        }
                    });
                }
            });
    });
}
