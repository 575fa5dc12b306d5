use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// `n` visually distinct bar colours, hues spaced evenly from a blue start.
pub fn series_colors(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            let [r, g, b] = [rgb.red, rgb.green, rgb.blue].map(|c| (c * 255.0).round() as u8);
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

/// Colour for status lines: red for failures, green otherwise.
pub fn status_color(is_error: bool) -> Color32 {
    if is_error {
        Color32::from_rgb(220, 60, 60)
    } else {
        Color32::from_rgb(60, 170, 90)
    }
}
