use std::sync::Arc;

use crate::identity::domain::face_encoder::FaceEncoder;
use crate::identity::domain::known_identity_set::KnownIdentitySet;
use crate::shared::frame::Frame;

use super::detection::{Detection, DetectionLabel, DetectionResult};
use super::detector::Detector;
use super::face_locator::FaceLocator;

/// Locates faces and names each one against the known identities.
///
/// Each face gets the canonical name of the first known entry it matches,
/// or `Unknown`. Closer matches further down the list never override an
/// earlier one.
pub struct FaceRecognitionDetector {
    locator: Box<dyn FaceLocator>,
    encoder: Box<dyn FaceEncoder>,
    known: Arc<KnownIdentitySet>,
}

impl FaceRecognitionDetector {
    pub fn new(
        locator: Box<dyn FaceLocator>,
        encoder: Box<dyn FaceEncoder>,
        known: Arc<KnownIdentitySet>,
    ) -> Self {
        Self {
            locator,
            encoder,
            known,
        }
    }

    fn recognize(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let faces = self.locator.locate(frame)?;

        let mut detections = Vec::with_capacity(faces.len());
        for face in faces {
            let encoding = self.encoder.encode(frame, &face)?;
            let label = match self.known.first_match(&encoding, self.encoder.as_ref()) {
                Some(known) => DetectionLabel::Identity(known.canonical_name().to_string()),
                None => DetectionLabel::Unknown,
            };
            detections.push(Detection::new(face, label));
        }
        Ok(detections)
    }
}

impl Detector for FaceRecognitionDetector {
    fn run(&mut self, frame: &Frame) -> DetectionResult {
        match self.recognize(frame) {
            Ok(detections) => {
                log::debug!("Recognized {} face(s)", detections.len());
                DetectionResult::completed(detections)
            }
            Err(e) => {
                log::error!("Face detection failed: {e}");
                DetectionResult::failed(e.to_string())
            }
        }
    }
}
