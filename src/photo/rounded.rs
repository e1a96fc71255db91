/// Rounded-corner post-processing for widget bitmaps
///
/// Clips the four corners of a raster to quarter circles via the alpha
/// channel. Edge pixels get partial alpha (anti-aliased), pixels fully
/// outside the arc become transparent black, everything else is copied.

use image::{Rgba, RgbaImage};

/// Return a copy of `src` with rounded corners of `radius` pixels
///
/// The radius is clamped to half the shorter side; a radius of zero
/// (or less) returns an unchanged copy.
pub fn round_corners(src: &RgbaImage, radius: f32) -> RgbaImage {
    let (width, height) = src.dimensions();
    let mut output = src.clone();

    let radius = if radius.is_finite() { radius } else { 0.0 };
    let radius = radius.min(width.min(height) as f32 / 2.0);
    if radius <= 0.0 {
        return output;
    }

    let (w, h) = (width as f32, height as f32);

    for (x, y, pixel) in output.enumerate_pixels_mut() {
        // Sample at the pixel centre
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;

        // Centre of the arc for whichever corner square we're in
        let arc_x = if px < radius {
            radius
        } else if px > w - radius {
            w - radius
        } else {
            continue;
        };
        let arc_y = if py < radius {
            radius
        } else if py > h - radius {
            h - radius
        } else {
            continue;
        };

        let distance = ((px - arc_x).powi(2) + (py - arc_y).powi(2)).sqrt();
        let coverage = (radius - distance + 0.5).clamp(0.0, 1.0);

        if coverage <= 0.0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else if coverage < 1.0 {
            pixel[3] = (f32::from(pixel[3]) * coverage).round() as u8;
        }
    }

    output
}
