use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// COCO class index for "person".
pub const PERSON_CLASS_ID: usize = 0;

/// One class-labeled box from a general object detector.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDetection {
    pub class_id: usize,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

/// Domain interface for general object detection.
pub trait ObjectDetector: Send {
    fn detect(&mut self, frame: &Frame)
        -> Result<Vec<ObjectDetection>, Box<dyn std::error::Error>>;
}
