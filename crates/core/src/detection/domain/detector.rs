use crate::shared::frame::Frame;

use super::detection::DetectionResult;

/// Domain interface for the per-cycle detection stage.
///
/// Never fails: implementations log internal errors and return a
/// [`DetectionResult::failed`] instead. Stateful implementations are
/// allowed, hence `&mut self`.
pub trait Detector: Send {
    fn run(&mut self, frame: &Frame) -> DetectionResult;
}
