//! # Raster
//!
//! The pixel side of the canvas. A [`RasterSurface`] owns the visible buffer, and can hand out
//! immutable [`Snapshot`]s of it or be overwritten by one. The history never looks inside a snapshot,
//! only at its shape.

mod buffer;

pub use buffer::PixelBuffer;

use crate::color::Rgba8;

pub type SnapshotID = crate::SequenceID<Snapshot>;

/// Size of a raster in whole pixels. Never zero in either axis.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Dimensions {
    width: u32,
    height: u32,
}
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionsError {
    #[error("width and height must be nonzero")]
    Zero,
    #[error("{0}x{1} pixels don't fit in memory")]
    TooLarge(u32, u32),
}
impl Dimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, DimensionsError> {
        if width == 0 || height == 0 {
            return Err(DimensionsError::Zero);
        }
        // Must be addressable as one slice of pixels.
        usize::try_from(u64::from(width) * u64::from(height))
            .ok()
            .and_then(|count| count.checked_mul(std::mem::size_of::<Rgba8>()))
            .filter(|bytes| isize::try_from(*bytes).is_ok())
            .ok_or(DimensionsError::TooLarge(width, height))?;
        Ok(Self { width, height })
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        // Checked on construction.
        self.width as usize * self.height as usize
    }
    /// Index of a pixel in row-major order, or `None` if out of bounds.
    #[must_use]
    pub fn index_of(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}
impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A raster was handed to a surface or history of a different shape.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("expected a {expected} raster, found {found}")]
pub struct DimensionMismatch {
    pub expected: Dimensions,
    pub found: Dimensions,
}

/// An immutable copy of an entire raster at one point in time.
///
/// Snapshots are deliberately not `Clone`: each one lives in exactly one place at a time,
/// and moves between the undo and redo stacks rather than being copied.
pub struct Snapshot {
    id: SnapshotID,
    dimensions: Dimensions,
    pixels: Box<[Rgba8]>,
}
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{dimensions} raster needs {} pixels, found {found}", .dimensions.pixel_count())]
pub struct PixelCountError {
    pub dimensions: Dimensions,
    pub found: usize,
}
impl Snapshot {
    /// Wrap a row-major pixel buffer, assigning it a fresh ID.
    pub fn new(dimensions: Dimensions, pixels: Box<[Rgba8]>) -> Result<Self, PixelCountError> {
        if pixels.len() != dimensions.pixel_count() {
            return Err(PixelCountError {
                dimensions,
                found: pixels.len(),
            });
        }
        Ok(Self {
            id: SnapshotID::next(),
            dimensions,
            pixels,
        })
    }
    #[must_use]
    pub fn id(&self) -> SnapshotID {
        self.id
    }
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }
    /// Pixels as tightly packed RGBA8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
/// Snapshots are equal if they are the same capture, regardless of content.
impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Snapshot {}
impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("id", &self.id)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

/// The visible pixel buffer of a canvas.
pub trait RasterSurface {
    /// Current shape of the visible buffer.
    fn dimensions(&self) -> Dimensions;
    /// Copy the visible buffer into a new snapshot. The snapshot must not share storage
    /// with anything that will be drawn into later.
    fn capture_snapshot(&self) -> Snapshot;
    /// Overwrite the entire visible buffer with the snapshot. No blending.
    /// If the shapes differ, the surface must be left untouched.
    fn restore_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), DimensionMismatch>;
    /// Overwrite the visible buffer with the blank state, i.e. the background fill.
    fn reset_to_empty(&mut self);
}

/// A surface that can change shape. Resizing discards the contents.
pub trait ResizableSurface: RasterSurface {
    fn resize(&mut self, dimensions: Dimensions);
}
