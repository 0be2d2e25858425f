//! Builds the known-identity set from a directory of reference photos.
use std::path::{Path, PathBuf};

use crate::detection::domain::face_locator::FaceLocator;
use crate::identity::domain::face_encoder::FaceEncoder;
use crate::identity::domain::identity_encoding::IdentityEncoding;
use crate::identity::domain::known_identity_set::KnownIdentitySet;
use crate::shared::image_files;

#[derive(Debug, thiserror::Error)]
pub enum IdentityLoadError {
    #[error("no face found in reference image {0}")]
    NoFaceFound(PathBuf),
    #[error("failed to decode reference image {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to read reference directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode face in {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// Encode one face per reference image in `dir`.
///
/// Files are visited in listing order; each contributes the first face the
/// locator returns, named after the file stem. A missing directory is
/// created and yields an empty set.
pub fn load(
    dir: &Path,
    locator: &mut dyn FaceLocator,
    encoder: &dyn FaceEncoder,
) -> Result<KnownIdentitySet, IdentityLoadError> {
    if !dir.exists() {
        log::warn!(
            "Known faces directory {} does not exist, creating it",
            dir.display()
        );
        std::fs::create_dir_all(dir).map_err(|source| IdentityLoadError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        return Ok(KnownIdentitySet::default());
    }

    let files = image_files::list_images(dir).map_err(|source| IdentityLoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        let frame = image_files::decode_file(&path).map_err(|source| IdentityLoadError::Decode {
            path: path.clone(),
            source,
        })?;

        let encode_error = |e: Box<dyn std::error::Error>| IdentityLoadError::Encode {
            path: path.clone(),
            message: e.to_string(),
        };
        let faces = locator.locate(&frame).map_err(encode_error)?;
        let face = faces
            .first()
            .ok_or_else(|| IdentityLoadError::NoFaceFound(path.clone()))?;
        let vector = encoder.encode(&frame, face).map_err(encode_error)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::debug!("Loaded known face {name} from {}", path.display());
        entries.push(IdentityEncoding::new(vector, name, path));
    }

    log::info!("Loaded {} known face(s) from {}", entries.len(), dir.display());
    Ok(KnownIdentitySet::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::frame::Frame;

    /// Reports one face per frame unless the top-left pixel is black.
    struct PixelLocator;

    impl FaceLocator for PixelLocator {
        fn locate(
            &mut self,
            frame: &Frame,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            if frame.pixel(0, 0) == Some([0, 0, 0]) {
                return Ok(vec![]);
            }
            Ok(vec![
                BoundingBox::new(0, 0, 4, 4),
                BoundingBox::new(4, 4, 8, 8),
            ])
        }
    }

    /// Encodes a face as `[red channel of top-left pixel, box x1]`.
    struct PixelEncoder;

    impl FaceEncoder for PixelEncoder {
        fn encode(
            &self,
            frame: &Frame,
            face: &BoundingBox,
        ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
            let [r, _, _] = frame.pixel(0, 0).ok_or("empty frame")?;
            Ok(vec![r as f32, face.x1 as f32])
        }

        fn is_match(&self, known: &[f32], candidate: &[f32]) -> bool {
            known == candidate
        }
    }

    fn write_png(dir: &Path, name: &str, rgb: [u8; 3]) {
        image::RgbImage::from_pixel(8, 8, image::Rgb(rgb))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_loads_one_encoding_per_image_named_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "alice_front.png", [10, 10, 10]);
        write_png(dir.path(), "bob.png", [20, 20, 20]);
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let set = load(dir.path(), &mut PixelLocator, &PixelEncoder).unwrap();

        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.entries().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alice_front", "bob"]);
        assert_eq!(set.entries()[0].canonical_name(), "alice");
        assert_eq!(set.entries()[0].vector(), &[10.0, 0.0]);
        assert_eq!(set.entries()[1].source(), dir.path().join("bob.png"));
    }

    #[test]
    fn test_image_without_face_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "alice.png", [10, 10, 10]);
        write_png(dir.path(), "empty.png", [0, 0, 0]);

        let err = load(dir.path(), &mut PixelLocator, &PixelEncoder).unwrap_err();
        assert!(matches!(err, IdentityLoadError::NoFaceFound(p) if p.ends_with("empty.png")));
    }

    #[test]
    fn test_undecodable_image_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.jpg"), b"not a jpeg").unwrap();

        let err = load(dir.path(), &mut PixelLocator, &PixelEncoder).unwrap_err();
        assert!(matches!(err, IdentityLoadError::Decode { .. }));
    }

    #[test]
    fn test_missing_directory_is_created_and_empty() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("known_faces");

        let set = load(&dir, &mut PixelLocator, &PixelEncoder).unwrap();
        assert!(set.is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_empty_directory_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = load(dir.path(), &mut PixelLocator, &PixelEncoder).unwrap();
        assert!(set.is_empty());
    }
}
