//! Still-image helpers shared by acquisition and identity loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Image files directly inside `dir`, sorted by file name.
///
/// Non-recursive; subdirectories and files with other extensions are skipped.
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Decode an encoded image (JPEG, PNG, ...) into an RGB frame.
pub fn decode_bytes(bytes: &[u8]) -> Result<Frame, image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok(Frame::from(img.to_rgb8()))
}

pub fn decode_file(path: &Path) -> Result<Frame, image::ImageError> {
    let img = image::open(path)?;
    Ok(Frame::from(img.to_rgb8()))
}
