//! Stores new reference photos in the known-faces directory.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("content type {0:?} is not an image")]
    NotAnImage(String),
    #[error("failed to store reference image {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RegistrationError {
    /// HTTP-style status for callers that expose registration over a wire.
    pub fn status_code(&self) -> u16 {
        match self {
            RegistrationError::NotAnImage(_) => 400,
            RegistrationError::Io { .. } => 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredFace {
    pub filename: String,
    pub path: PathBuf,
}

/// Writes uploads as `{name}_{YYYYMMDDHHMMSS}{ext}`.
///
/// Registered photos are picked up on the next start, when the known
/// identities are loaded again.
pub struct FaceRegistry {
    dir: PathBuf,
}

impl FaceRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn register(
        &self,
        name: &str,
        content_type: &str,
        original_filename: &str,
        bytes: &[u8],
        now: DateTime<Local>,
    ) -> Result<RegisteredFace, RegistrationError> {
        if !content_type.starts_with("image/") {
            return Err(RegistrationError::NotAnImage(content_type.to_string()));
        }

        let extension = Path::new(original_filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let filename = format!("{name}_{}{extension}", now.format("%Y%m%d%H%M%S"));
        let path = self.dir.join(&filename);

        let io_error = |source| RegistrationError::Io {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_error)?;
        std::fs::write(&path, bytes).map_err(io_error)?;

        log::info!("Registered face {name} as {}", path.display());
        Ok(RegisteredFace { filename, path })
    }
}

/// Best-effort MIME type from a file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
