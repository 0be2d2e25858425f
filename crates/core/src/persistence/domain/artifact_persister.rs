use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::detection::domain::detection::DetectionResult;
use crate::shared::clock::Clock;
use crate::shared::frame::Frame;

use super::artifact_name::artifact_file_name;
use super::frame_annotator::FrameAnnotator;
use super::image_writer::ImageWriter;

/// An annotated frame that has been written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedArtifact {
    pub path: PathBuf,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to save {path}: {message}")]
pub struct PersistenceError {
    pub path: PathBuf,
    pub message: String,
}

/// Annotates detection frames and saves them into the output directory.
pub struct ArtifactPersister {
    annotator: Box<dyn FrameAnnotator>,
    writer: Box<dyn ImageWriter>,
    clock: Box<dyn Clock>,
    output_dir: PathBuf,
}

impl ArtifactPersister {
    pub fn new(
        annotator: Box<dyn FrameAnnotator>,
        writer: Box<dyn ImageWriter>,
        clock: Box<dyn Clock>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            annotator,
            writer,
            clock,
            output_dir: output_dir.into(),
        }
    }

    /// Draw every detection onto `frame` and write it as JPEG.
    pub fn render_and_save(
        &self,
        mut frame: Frame,
        result: &DetectionResult,
    ) -> Result<PersistedArtifact, PersistenceError> {
        self.annotator.annotate(&mut frame, result.detections());

        let timestamp = self.clock.now();
        let path = self.output_dir.join(artifact_file_name(result, &timestamp));
        self.writer
            .write(&path, &frame)
            .map_err(|e| PersistenceError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        log::info!("Saved detection image to {}", path.display());
        Ok(PersistedArtifact { path, timestamp })
    }
}
