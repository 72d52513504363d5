//! A round, hard-edged brush. Each segment of a stroke is drawn as a capsule with a one pixel
//! antialiased rim, composited once per pixel so a segment never darkens itself.

use sketchpad_core::{
    color::Rgba8,
    raster::{PixelBuffer, RasterSurface},
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Brush {
    /// Diameter in pixels.
    pub width: f32,
    pub color: Rgba8,
}
impl Default for Brush {
    fn default() -> Self {
        Self {
            width: 4.0,
            color: Rgba8::BLACK,
        }
    }
}
impl From<&crate::global::settings::BrushSettings> for Brush {
    fn from(value: &crate::global::settings::BrushSettings) -> Self {
        Self {
            width: value.width,
            color: value.color,
        }
    }
}
impl Brush {
    /// A single round dab, as left by a click without movement.
    pub fn dab(&self, surface: &mut PixelBuffer, at: [f32; 2]) {
        self.segment(surface, at, at);
    }
    /// Draw from one point to another with round caps.
    pub fn segment(&self, surface: &mut PixelBuffer, from: [f32; 2], to: [f32; 2]) {
        let radius = self.width.max(0.0) / 2.0;
        if radius <= 0.0 || ![from, to].iter().flatten().all(|v| v.is_finite()) {
            return;
        }
        let dims = surface.dimensions();
        // Pixel centers sit at +0.5. Reach one extra pixel for the antialiased rim.
        let reach = radius + 1.0;
        let min_x = (from[0].min(to[0]) - reach).floor().max(0.0);
        let min_y = (from[1].min(to[1]) - reach).floor().max(0.0);
        let max_x = (from[0].max(to[0]) + reach).ceil().min(dims.width() as f32);
        let max_y = (from[1].max(to[1]) + reach).ceil().min(dims.height() as f32);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        for y in (min_y as u32)..(max_y as u32) {
            for x in (min_x as u32)..(max_x as u32) {
                let center = [x as f32 + 0.5, y as f32 + 0.5];
                let dist = distance_to_segment(center, from, to);
                let coverage = (radius + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    surface.blend(x, y, self.color, coverage);
                }
            }
        }
    }
}

fn distance_to_segment(point: [f32; 2], from: [f32; 2], to: [f32; 2]) -> f32 {
    let seg = [to[0] - from[0], to[1] - from[1]];
    let rel = [point[0] - from[0], point[1] - from[1]];
    let len_sq = seg[0] * seg[0] + seg[1] * seg[1];
    let t = if len_sq > 0.0 {
        ((rel[0] * seg[0] + rel[1] * seg[1]) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let nearest = [from[0] + seg[0] * t, from[1] + seg[1] * t];
    (point[0] - nearest[0]).hypot(point[1] - nearest[1])
}
