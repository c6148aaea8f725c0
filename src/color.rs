use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

pub const MALE_COLOR: Color32 = Color32::from_rgb(135, 206, 250);
pub const FEMALE_COLOR: Color32 = Color32::from_rgb(255, 182, 193);

const BLUE_HUE: f32 = 210.0;

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// `n` visually distinct colours with evenly spaced hues (pie slices).
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

/// Continuous blue scale: small values light, `max` darkest.
pub fn blue_scale(value: f64, max: f64) -> Color32 {
    let t = if max > 0.0 { (value / max).clamp(0.0, 1.0) as f32 } else { 0.0 };
    let lightness = 0.85 - 0.55 * t;
    hsl_to_color32(Hsl::new(BLUE_HUE, 0.7, lightness))
}
