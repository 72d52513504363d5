use super::{DimensionMismatch, Dimensions, RasterSurface, ResizableSurface, Snapshot};
use crate::color::Rgba8;

/// A CPU-side raster surface. Blank means filled with the background color.
pub struct PixelBuffer {
    dimensions: Dimensions,
    background: Rgba8,
    // Row-major. Invariant: len == dimensions.pixel_count()
    pixels: Vec<Rgba8>,
}
impl PixelBuffer {
    #[must_use]
    pub fn new(dimensions: Dimensions, background: Rgba8) -> Self {
        Self {
            dimensions,
            background,
            pixels: vec![background; dimensions.pixel_count()],
        }
    }
    #[must_use]
    pub fn background(&self) -> Rgba8 {
        self.background
    }
    /// Change the fill used by [`RasterSurface::reset_to_empty`]. Existing pixels are unaffected.
    pub fn set_background(&mut self, background: Rgba8) {
        self.background = background;
    }
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }
    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.dimensions
            .index_of(x, y)
            .map(|idx| self.pixels[idx])
    }
    /// Composite `color` over the pixel at `(x, y)`. Out of bounds writes are ignored.
    pub fn blend(&mut self, x: u32, y: u32, color: Rgba8, coverage: f32) {
        if let Some(idx) = self.dimensions.index_of(x, y) {
            let pixel = &mut self.pixels[idx];
            *pixel = color.over(*pixel, coverage);
        }
    }
}
impl RasterSurface for PixelBuffer {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
    fn capture_snapshot(&self) -> Snapshot {
        // Always a fresh allocation, never aliases `self.pixels`.
        let pixels: Box<[Rgba8]> = self.pixels.as_slice().into();
        // Lengths are tied by our own invariant.
        match Snapshot::new(self.dimensions, pixels) {
            Ok(snapshot) => snapshot,
            Err(e) => unreachable!("pixel buffer out of sync with its dimensions: {e}"),
        }
    }
    fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), DimensionMismatch> {
        if snapshot.dimensions() != self.dimensions {
            return Err(DimensionMismatch {
                expected: self.dimensions,
                found: snapshot.dimensions(),
            });
        }
        self.pixels.copy_from_slice(snapshot.pixels());
        Ok(())
    }
    fn reset_to_empty(&mut self) {
        self.pixels.fill(self.background);
    }
}
impl ResizableSurface for PixelBuffer {
    fn resize(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
        self.pixels.clear();
        self.pixels.resize(dimensions.pixel_count(), self.background);
    }
}

#[cfg(test)]
mod test {
    use super::PixelBuffer;
    use crate::{
        color::Rgba8,
        raster::{Dimensions, RasterSurface, ResizableSurface},
    };

    fn buffer(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(Dimensions::new(width, height).unwrap(), Rgba8::WHITE)
    }

    #[test]
    fn starts_blank() {
        let buffer = buffer(3, 2);
        assert!(buffer.pixels().iter().all(|&p| p == Rgba8::WHITE));
        assert_eq!(buffer.as_bytes().len(), 3 * 2 * 4);
    }
    #[test]
    fn snapshot_is_detached() {
        let mut buffer = buffer(2, 2);
        buffer.blend(0, 0, Rgba8::BLACK, 1.0);
        let snapshot = buffer.capture_snapshot();
        // Drawing after capture must not leak into the snapshot.
        buffer.blend(1, 1, Rgba8::BLACK, 1.0);
        assert_eq!(snapshot.pixels()[0], Rgba8::BLACK);
        assert_eq!(snapshot.pixels()[3], Rgba8::WHITE);

        buffer.restore_snapshot(&snapshot).unwrap();
        assert_eq!(buffer.get(1, 1), Some(Rgba8::WHITE));
        assert_eq!(buffer.get(0, 0), Some(Rgba8::BLACK));
    }
    #[test]
    fn restore_rejects_other_shapes() {
        let mut small = buffer(2, 2);
        small.blend(0, 0, Rgba8::BLACK, 1.0);
        let other = buffer(3, 3).capture_snapshot();
        assert!(small.restore_snapshot(&other).is_err());
        // Untouched.
        assert_eq!(small.get(0, 0), Some(Rgba8::BLACK));
    }
    #[test]
    fn reset_uses_background() {
        let mut buffer = buffer(2, 2);
        buffer.blend(0, 0, Rgba8::BLACK, 1.0);
        buffer.set_background(Rgba8::TRANSPARENT);
        buffer.reset_to_empty();
        assert!(buffer.pixels().iter().all(|&p| p == Rgba8::TRANSPARENT));
    }
    #[test]
    fn out_of_bounds_ignored() {
        let mut buffer = buffer(2, 2);
        buffer.blend(5, 0, Rgba8::BLACK, 1.0);
        assert_eq!(buffer.get(5, 0), None);
        assert!(buffer.pixels().iter().all(|&p| p == Rgba8::WHITE));
    }
    #[test]
    fn resize() {
        let mut buffer = buffer(2, 2);
        buffer.blend(0, 0, Rgba8::BLACK, 1.0);
        let dims = Dimensions::new(4, 1).unwrap();
        buffer.resize(dims);
        assert_eq!(buffer.dimensions(), dims);
        assert_eq!(buffer.pixels().len(), 4);
        assert!(buffer.pixels().iter().all(|&p| p == Rgba8::WHITE));
    }
}
