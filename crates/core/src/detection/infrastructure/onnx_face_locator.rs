//! Face localization with a YOLO-pose face model via `ort`.
use std::path::Path;

use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::yolo;

/// Default confidence threshold for face boxes.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

const NMS_IOU_THRESH: f64 = 0.45;

/// Single-class model; the keypoint columns after the score are ignored.
const NUM_CLASSES: usize = 1;

/// YOLO face locator backed by an ONNX Runtime session.
pub struct OnnxFaceLocator {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxFaceLocator {
    /// Load the face model. Input resolution comes from the model (NCHW),
    /// falling back to 640 when dynamic.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = yolo::open_session(model_path)?;
        let input_size = yolo::input_size(&session);
        log::debug!(
            "Loaded face model {} ({input_size}x{input_size})",
            model_path.display()
        );
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceLocator for OnnxFaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        let mut candidates = yolo::infer(
            &mut self.session,
            frame,
            self.input_size,
            NUM_CLASSES,
            self.confidence,
        )?;
        let faces = yolo::nms(&mut candidates, NMS_IOU_THRESH);
        Ok(faces
            .iter()
            .map(|c| BoundingBox::from_f64(c.bbox[0], c.bbox[1], c.bbox[2], c.bbox[3]))
            .collect())
    }
}
