//! General object detection with a COCO-trained YOLO model via `ort`.
use std::path::Path;

use crate::detection::domain::object_detector::{ObjectDetection, ObjectDetector};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::yolo;

/// Default confidence threshold for object boxes.
pub const DEFAULT_CONFIDENCE: f64 = 0.25;

const NMS_IOU_THRESH: f64 = 0.45;

/// COCO class count.
pub const NUM_CLASSES: usize = 80;

/// YOLO object detector backed by an ONNX Runtime session.
pub struct OnnxObjectDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxObjectDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = yolo::open_session(model_path)?;
        let input_size = yolo::input_size(&session);
        log::debug!(
            "Loaded object model {} ({input_size}x{input_size})",
            model_path.display()
        );
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl ObjectDetector for OnnxObjectDetector {
    fn detect(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<ObjectDetection>, Box<dyn std::error::Error>> {
        let mut candidates = yolo::infer(
            &mut self.session,
            frame,
            self.input_size,
            NUM_CLASSES,
            self.confidence,
        )?;
        Ok(yolo::nms(&mut candidates, NMS_IOU_THRESH)
            .into_iter()
            .map(|c| ObjectDetection {
                class_id: c.class_id,
                confidence: c.confidence,
                bbox: BoundingBox::from_f64(c.bbox[0], c.bbox[1], c.bbox[2], c.bbox[3]),
            })
            .collect())
    }
}
