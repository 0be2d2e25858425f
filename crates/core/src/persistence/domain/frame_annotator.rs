use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

/// Draws detections onto a frame in place.
///
/// Coordinates are used as given; anything falling outside the frame is
/// clipped by the drawing primitives rather than rejected.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, detections: &[Detection]);
}
