use std::fmt;

use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::UNKNOWN_LABEL;

/// What a located region was classified as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectionLabel {
    /// Recognized face; holds the canonical display name.
    Identity(String),
    /// Face that matched no known identity.
    Unknown,
    /// Person found by the object detector.
    Person,
}

impl DetectionLabel {
    /// Text drawn next to the box. Person boxes are drawn bare.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            DetectionLabel::Identity(name) => Some(name.as_str()),
            DetectionLabel::Unknown => Some(UNKNOWN_LABEL),
            DetectionLabel::Person => None,
        }
    }
}

impl fmt::Display for DetectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionLabel::Identity(name) => write!(f, "{name}"),
            DetectionLabel::Unknown => write!(f, "{UNKNOWN_LABEL}"),
            DetectionLabel::Person => write!(f, "person"),
        }
    }
}

/// One located region. Every detection carries its label, so locations and
/// labels can never get out of step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub bbox: Option<BoundingBox>,
    pub label: DetectionLabel,
}

impl Detection {
    pub fn new(bbox: BoundingBox, label: DetectionLabel) -> Self {
        Self {
            bbox: Some(bbox),
            label,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetectionStatus {
    Completed,
    /// The detection capability failed; treated as nothing detected.
    Failed(String),
}

/// Detections for one frame, in detector order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectionResult {
    detections: Vec<Detection>,
    status: DetectionStatus,
}

impl DetectionResult {
    pub fn completed(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            status: DetectionStatus::Completed,
        }
    }

    pub fn empty() -> Self {
        Self::completed(Vec::new())
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            detections: Vec::new(),
            status: DetectionStatus::Failed(reason.into()),
        }
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn status(&self) -> &DetectionStatus {
        &self.status
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, DetectionStatus::Failed(_))
    }

    /// Labels in detection order, one per detection.
    pub fn labels(&self) -> Vec<String> {
        self.detections.iter().map(|d| d.label.to_string()).collect()
    }

    /// Distinct recognized names, in first-seen order.
    pub fn identified_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for d in &self.detections {
            if let DetectionLabel::Identity(name) = &d.label {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }

    /// Filename context: recognized names joined by `-`, if any.
    pub fn context_token(&self) -> Option<String> {
        let names = self.identified_names();
        if names.is_empty() {
            None
        } else {
            Some(names.join("-"))
        }
    }
}
