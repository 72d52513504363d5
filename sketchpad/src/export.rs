//! Writing the canvas out as an 8-bit RGBA PNG.

use sketchpad_core::raster::{PixelBuffer, RasterSurface};

/// Encode the surface into any writer.
pub fn encode_png<W: std::io::Write>(
    surface: &PixelBuffer,
    writer: W,
) -> Result<(), png::EncodingError> {
    let dimensions = surface.dimensions();
    let mut encoder = png::Encoder::new(writer, dimensions.width(), dimensions.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(surface.as_bytes())?;
    writer.finish()
}

/// Encode the surface into a new file at `path`, replacing any existing file.
pub fn write_png(surface: &PixelBuffer, path: &std::path::Path) -> anyhow::Result<()> {
    use anyhow::Context;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path:?}"))?;
    encode_png(surface, std::io::BufWriter::new(file))
        .with_context(|| format!("encoding {path:?}"))?;
    log::info!("Exported {} canvas to {path:?}", surface.dimensions());
    Ok(())
}
