use std::fs;
use std::io::{self, BufWriter};
use std::path::Path;

use crate::sim::FieldImage;

#[derive(Debug, thiserror::Error)]
pub enum ScreenshotError {
    #[error("cannot create screenshot file: {0}")]
    Io(#[from] io::Error),
    #[error("cannot encode screenshot: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// Encode a scanned field as an RGBA PNG file.
pub fn save_png(path: &Path, field: &FieldImage) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, field.width as u32, field.height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(field.as_bytes())?;
    Ok(())
}
