use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::acquisition::domain::camera_client::CameraClient;
use crate::acquisition::domain::image_source::{
    AcquiredFrame, AcquisitionError, FrameOrigin, ImageSource,
};
use crate::shared::image_files;

/// Camera snapshot with a random local still as stand-in.
///
/// When the camera fetch or its decode fails, one image from the fallback
/// directory is picked uniformly at random so the rest of the pipeline keeps
/// running. The chosen file is logged, since an alert built on it shows a
/// stale picture.
pub struct FallbackImageSource {
    camera: Box<dyn CameraClient>,
    fallback_dir: Option<PathBuf>,
    rng: StdRng,
}

impl FallbackImageSource {
    pub fn new(camera: Box<dyn CameraClient>, fallback_dir: Option<PathBuf>) -> Self {
        Self::with_rng(camera, fallback_dir, StdRng::from_entropy())
    }

    pub fn with_rng(
        camera: Box<dyn CameraClient>,
        fallback_dir: Option<PathBuf>,
        rng: StdRng,
    ) -> Self {
        Self {
            camera,
            fallback_dir,
            rng,
        }
    }

    fn acquire_live(&self) -> Result<AcquiredFrame, Box<dyn std::error::Error>> {
        let bytes = self.camera.fetch_snapshot()?;
        let frame = image_files::decode_bytes(&bytes)?;
        Ok(AcquiredFrame {
            frame,
            origin: FrameOrigin::Live,
        })
    }

    fn acquire_fallback(&mut self, dir: &Path) -> Result<AcquiredFrame, AcquisitionError> {
        let candidates = image_files::list_images(dir).map_err(|e| {
            AcquisitionError::NoImageAvailable(format!(
                "fallback directory {} unreadable: {e}",
                dir.display()
            ))
        })?;
        let chosen = candidates.choose(&mut self.rng).ok_or_else(|| {
            AcquisitionError::NoImageAvailable(format!(
                "fallback directory {} has no images",
                dir.display()
            ))
        })?;

        log::info!("Using fallback image {}", chosen.display());
        let frame = image_files::decode_file(chosen).map_err(|e| {
            AcquisitionError::NoImageAvailable(format!(
                "fallback image {} undecodable: {e}",
                chosen.display()
            ))
        })?;
        Ok(AcquiredFrame {
            frame,
            origin: FrameOrigin::Fallback(chosen.clone()),
        })
    }
}

impl ImageSource for FallbackImageSource {
    fn acquire(&mut self) -> Result<AcquiredFrame, AcquisitionError> {
        let live_err = match self.acquire_live() {
            Ok(acquired) => {
                log::info!("Using live image from {}", self.camera.describe());
                return Ok(acquired);
            }
            Err(e) => e,
        };
        log::warn!(
            "Camera fetch from {} failed: {live_err}",
            self.camera.describe()
        );

        match self.fallback_dir.clone() {
            Some(dir) => self.acquire_fallback(&dir),
            None => Err(AcquisitionError::NoImageAvailable(format!(
                "camera failed ({live_err}) and no fallback directory is configured"
            ))),
        }
    }
}
