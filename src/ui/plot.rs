use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use fileflow::data::preview::ChartSeries;

use crate::color::series_colors;

const GROUP_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Bar chart of the first numeric columns
// ---------------------------------------------------------------------------

/// Grouped bars, one group per row, one bar per series. Missing values are
/// simply not drawn.
pub fn bar_chart(ui: &mut Ui, id: &str, series: &[ChartSeries]) {
    if series.is_empty() {
        ui.weak("No numeric columns to chart.");
        return;
    }

    let colors = series_colors(series.len());
    let bar_width = GROUP_WIDTH / series.len() as f64;

    Plot::new(id)
        .legend(Legend::default())
        .height(260.0)
        .x_axis_label("Row")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, (s, color)) in series.iter().zip(colors).enumerate() {
                let offset = (idx as f64 + 0.5) * bar_width - GROUP_WIDTH / 2.0;
                let bars: Vec<Bar> = s
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(row, v)| v.map(|v| Bar::new(row as f64 + offset, v)))
                    .map(|bar| bar.width(bar_width))
                    .collect();

                plot_ui.bar_chart(BarChart::new(bars).name(&s.name).color(color));
            }
        });
}
