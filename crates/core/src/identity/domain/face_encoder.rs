use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Domain interface for face identity embeddings.
///
/// The match tolerance belongs to the implementation: callers only ask
/// whether two encodings are the same person.
pub trait FaceEncoder: Send {
    /// Embedding of the face inside `face` in `frame`.
    fn encode(
        &self,
        frame: &Frame,
        face: &BoundingBox,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error>>;

    /// Whether `candidate` falls within tolerance of `known`.
    fn is_match(&self, known: &[f32], candidate: &[f32]) -> bool;
}
