use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Continuous color ramp for the scatter plot
// ---------------------------------------------------------------------------

/// Map `t` in `[0, 1]` onto a cold-to-warm hue ramp (blue → red).
pub fn ramp_color(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    // 240° (blue) down to 0° (red).
    let hsl = Hsl::new(240.0 * (1.0 - t), 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// One color per projected point, graded by its PC1 coordinate. A corpus
/// whose first component collapses to a single value renders mid-ramp.
pub fn point_colors(projection: &[[f64; 2]]) -> Vec<Color32> {
    let min = projection.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let max = projection
        .iter()
        .map(|p| p[0])
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    projection
        .iter()
        .map(|p| {
            if range > f64::EPSILON {
                ramp_color((p[0] - min) / range)
            } else {
                ramp_color(0.5)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints_differ() {
        assert_ne!(ramp_color(0.0), ramp_color(1.0));
    }

    #[test]
    fn one_color_per_point() {
        let projection = vec![[0.0, 0.0], [1.0, 2.0], [-1.0, 0.5]];
        assert_eq!(point_colors(&projection).len(), 3);
    }

    #[test]
    fn degenerate_projection_gets_a_uniform_color() {
        let projection = vec![[0.0, 1.0], [0.0, 2.0]];
        let colors = point_colors(&projection);
        assert_eq!(colors[0], colors[1]);
    }
}
