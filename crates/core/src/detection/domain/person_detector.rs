use crate::shared::frame::Frame;

use super::detection::{Detection, DetectionLabel, DetectionResult};
use super::detector::Detector;
use super::object_detector::{ObjectDetector, PERSON_CLASS_ID};

/// Presence check for people.
///
/// Stops at the first person box the object detector reports, so the result
/// holds at most one detection even when several people are visible.
pub struct PersonDetector {
    detector: Box<dyn ObjectDetector>,
}

impl PersonDetector {
    pub fn new(detector: Box<dyn ObjectDetector>) -> Self {
        Self { detector }
    }
}

impl Detector for PersonDetector {
    fn run(&mut self, frame: &Frame) -> DetectionResult {
        let objects = match self.detector.detect(frame) {
            Ok(objects) => objects,
            Err(e) => {
                log::error!("Person detection failed: {e}");
                return DetectionResult::failed(e.to_string());
            }
        };

        match objects.iter().find(|o| o.class_id == PERSON_CLASS_ID) {
            Some(person) => {
                log::debug!("Person found with confidence {:.2}", person.confidence);
                DetectionResult::completed(vec![Detection::new(
                    person.bbox,
                    DetectionLabel::Person,
                )])
            }
            None => DetectionResult::empty(),
        }
    }
}
