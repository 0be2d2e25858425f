use std::path::Path;

use crate::persistence::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// JPEG quality, matching the common OpenCV default.
const JPEG_QUALITY: u8 = 95;

/// Writes frames as JPEG files using the `image` crate.
///
/// The parent directory is created on first write.
pub struct JpegFileWriter;

impl JpegFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JpegFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for JpegFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::File::create(path)?;
        let mut out = std::io::BufWriter::new(file);
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        image::ImageEncoder::write_image(
            encoder,
            frame.data(),
            frame.width(),
            frame.height(),
            image::ExtendedColorType::Rgb8,
        )?;
        std::io::Write::flush(&mut out)?;
        Ok(())
    }
}
